//! # Concurrency
//!
//! Many callers sharing one container: the historical cache must load once
//! per refresh, every batch must stay internally distinct, and a draw number
//! must be stored at most once.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use lotto_generation::{DrawRecordOutcome, RequesterId};

    use crate::integration::fixtures::{draw, PipelineBuilder};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_batches_share_one_refresh() {
        let p = PipelineBuilder::new()
            .draws((1..=100).map(|n| draw(n, [3, 11, 19, 27, 35, (n % 3) as u8 + 40])))
            .build();
        p.store.set_list_delay(Duration::from_millis(50));
        let api = Arc::clone(&p.container.api);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let api = Arc::clone(&api);
                tokio::spawn(async move {
                    api.generate_predictions(5, Some(RequesterId::new(format!("user-{}", i))))
                        .await
                })
            })
            .collect();

        let mut batch_ids = HashSet::new();
        for handle in handles {
            let outcome = handle.await.unwrap().unwrap();
            let distinct: HashSet<_> = outcome.batch.combinations.iter().collect();
            assert_eq!(distinct.len(), 5);
            assert_eq!(outcome.batch.target_draw, Some(101));
            batch_ids.insert(outcome.batch.id);
        }

        assert_eq!(batch_ids.len(), 16);
        assert_eq!(p.store.list_calls(), 1);
        assert_eq!(p.store.persisted().len(), 16);
        let metrics = p.container.metrics.snapshot();
        assert_eq!(metrics.cache_refreshes, 1);
        assert_eq!(metrics.batches_generated, 16);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_record_draw_inserts_once() {
        let p = PipelineBuilder::new().build();
        let api = Arc::clone(&p.container.api);

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let api = Arc::clone(&api);
                tokio::spawn(async move {
                    api.record_draw(draw(1121, [3, 11, 19, 27, 35, 36 + i])).await
                })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() == DrawRecordOutcome::Inserted {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(p.store.draw_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_generation_interleaved_with_recording() {
        let p = PipelineBuilder::new().draws([draw(1, [3, 11, 19, 27, 35, 42])]).build();
        let api = Arc::clone(&p.container.api);

        let recorder = {
            let api = Arc::clone(&api);
            tokio::spawn(async move {
                for n in 2..=21u32 {
                    let last = 20 + n as u8;
                    api.record_draw(draw(n, [1, 7, 13, 17, 19, last])).await.unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };
        let generators: Vec<_> = (0..8)
            .map(|_| {
                let api = Arc::clone(&api);
                tokio::spawn(async move { api.generate_predictions(10, None).await })
            })
            .collect();

        recorder.await.unwrap();
        for handle in generators {
            let outcome = handle.await.unwrap().unwrap();
            assert_eq!(outcome.batch.len(), 10);
            let target = outcome.batch.target_draw.unwrap();
            assert!((2..=22).contains(&target));
        }

        let latest = p.container.api.generate_predictions(1, None).await.unwrap();
        assert_eq!(latest.batch.target_draw, Some(22));
    }
}
