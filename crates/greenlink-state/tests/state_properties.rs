//! Property tests for the state machines.

use greenlink_core::{BatchId, JobId, NodeId, RequestId};
use greenlink_state::{
    AssetClass, BatchStatus, JobOutcome, Priority, ProcessingBatch, RepairJob, RestockRequest,
    RestockStatus, SignOffStamp, Urgency, MAX_STEP, PROGRESS_COMPLETE,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn batch_progress_is_bounded_and_consistent(start in 0u8..=100, calls in 0usize..20) {
        let mut batch = ProcessingBatch::new(
            BatchId::new("BATCH-P"), "Node", "Mixed Logic Boards", "10kg", 10, start,
        ).unwrap();
        let mut last = batch.progress();
        for _ in 0..calls {
            let _ = batch.advance();
            prop_assert!(batch.progress() <= PROGRESS_COMPLETE);
            prop_assert!(batch.progress() >= last);
            prop_assert_eq!(batch.status(), BatchStatus::from_progress(batch.progress()));
            last = batch.progress();
        }
    }

    #[test]
    fn restock_never_skips(ops in proptest::collection::vec(0u8..3, 0..12)) {
        let mut r = RestockRequest::new(
            RequestId::new("REQ-P"), NodeId::new("NODE-P"), "Part", 1, 10, Urgency::Standard, "Test",
        );
        let mut prev_status = r.status;
        let mut prev_len = r.audit_log.len();
        for op in ops {
            let _ = match op {
                0 => r.begin_verification(),
                1 => r.approve(),
                _ => r.dispatch(),
            };
            prop_assert!(r.status == prev_status || prev_status.next() == Some(r.status));
            prop_assert!(r.audit_log.len() >= prev_len);
            prev_status = r.status;
            prev_len = r.audit_log.len();
        }
        prop_assert!(r.status >= RestockStatus::Pending);
    }

    #[test]
    fn job_step_never_exceeds_limit(calls in 0usize..12) {
        let mut job = RepairJob::new(
            JobId::new("ASSET-P"), "Device", "Issue", AssetClass::Consumer, Priority::Standard,
        );
        job.accept().unwrap();
        for _ in 0..calls {
            let _ = job.log_step();
        }
        prop_assert_eq!(job.current_step, (calls as u8).min(MAX_STEP));
    }

    #[test]
    fn finalized_stamp_never_changes(hashes in proptest::collection::vec("[0-9A-F]{8}", 1..5)) {
        let mut job = RepairJob::new(
            JobId::new("ASSET-P"), "Device", "Issue", AssetClass::Government, Priority::High,
        );
        job.accept().unwrap();
        let review = job.review(JobOutcome::Repair).unwrap();
        for hash in &hashes {
            let _ = job.finalize(&review, SignOffStamp {
                completed_at: "now".to_string(),
                tx_hash: format!("0x{hash}"),
                signer_id: "TECH".to_string(),
            });
        }
        prop_assert_eq!(job.tx_hash, Some(format!("0x{}", hashes[0])));
    }
}
