//! # Pipeline Flows
//!
//! End-to-end runs through `Container` with in-process store, sampler and
//! channel:
//!
//! 1. **Generate**: history refresh → per-slot screening → persist → notify
//! 2. **Record draw**: store → cache invalidation → next batch excludes it
//! 3. **Compare**: stored batches scored against the recorded draw
//! 4. **Failure paths**: validation, unavailable history, exhaustion,
//!    persist and notification failures

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use lotto_generation::{
        Combination, DataError, DrawRecordOutcome, GenerationConfigBuilder, GenerationError,
        HistoricalRecord, PatternFilter, PrizeRank, RequesterId,
    };

    use crate::integration::fixtures::{combo, draw, PipelineBuilder, CHAT_ID};

    const A: [u8; 6] = [3, 11, 19, 27, 35, 42];
    const B: [u8; 6] = [5, 12, 18, 26, 33, 41];

    // =========================================================================
    // GENERATE
    // =========================================================================

    #[tokio::test]
    async fn test_historical_combination_is_skipped() {
        let p = PipelineBuilder::new()
            .draws([draw(1120, A)])
            .script([combo([42, 35, 27, 19, 11, 3]), combo(B)])
            .build();

        let outcome = p.container.api.generate_predictions(1, None).await.unwrap();

        assert_eq!(outcome.batch.combinations, vec![combo(B)]);
        assert_eq!(outcome.batch.target_draw, Some(1121));
        assert_eq!(p.sampler.draws(), 2);

        let persisted = p.store.persisted();
        assert_eq!(persisted.len(), 1);
        assert_eq!(Some(persisted[0].0), outcome.record_id);
        assert_eq!(persisted[0].1, outcome.batch);

        assert!(outcome.notified);
        let sent = p.channel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, CHAT_ID);
        assert!(sent[0].1.contains("1. [5, 12, 18, 26, 33, 41]"));
        assert!(sent[0].1.contains("Target draw: #1121"));
    }

    #[tokio::test]
    async fn test_secure_batch_meets_every_acceptance_rule() {
        let history: Vec<_> = (1..=50u32)
            .map(|n| {
                let base = (n % 30) as u8 + 1;
                draw(n, [base, base + 3, base + 7, base + 8, base + 12, base + 15])
            })
            .collect();
        let drawn: HashSet<Combination> = history.iter().map(|d| d.combination).collect();
        let p = PipelineBuilder::new().draws(history).build();

        let outcome = p.container.api.generate_predictions(20, None).await.unwrap();
        let batch = outcome.batch.combinations;

        assert_eq!(batch.len(), 20);
        let distinct: HashSet<_> = batch.iter().collect();
        assert_eq!(distinct.len(), 20);
        for combination in &batch {
            assert!(!drawn.contains(combination));
            assert!(!PatternFilter::is_rejected(combination));
            assert!(combination.numbers().windows(2).all(|w| w[0] < w[1]));
            assert!(combination.iter().all(|n| (1..=45).contains(&n)));
        }
    }

    #[tokio::test]
    async fn test_intra_batch_duplicate_is_redrawn() {
        let p = PipelineBuilder::new()
            .script([combo(A), combo(A), combo(B)])
            .build();

        let outcome = p.container.api.generate_predictions(2, None).await.unwrap();

        assert_eq!(outcome.batch.combinations, vec![combo(A), combo(B)]);
        let metrics = p.container.metrics.snapshot();
        assert_eq!(metrics.candidates_drawn, 3);
        assert_eq!(metrics.rejected_in_batch, 1);
    }

    #[tokio::test]
    async fn test_long_batch_is_split_across_messages() {
        let p = PipelineBuilder::new().max_message_chars(60).build();

        let outcome = p.container.api.generate_predictions(8, None).await.unwrap();
        assert!(outcome.notified);

        let sent = p.channel.sent();
        assert!(sent.len() > 1);
        assert!(sent.iter().all(|(_, text)| text.chars().count() <= 60));
        let joined: String = sent
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        for (i, combination) in outcome.batch.combinations.iter().enumerate() {
            assert!(joined.contains(&format!("{}. {}", i + 1, combination)));
        }
    }

    // =========================================================================
    // RECORD DRAW
    // =========================================================================

    #[tokio::test]
    async fn test_recorded_draw_is_excluded_from_next_batch() {
        let p = PipelineBuilder::new()
            .draws([draw(1120, [1, 2, 3, 4, 5, 6])])
            .script([combo(A), combo(A), combo(B)])
            .build();

        let first = p.container.api.generate_predictions(1, None).await.unwrap();
        assert_eq!(first.batch.combinations, vec![combo(A)]);

        let recorded = p.container.api.record_draw(draw(1121, A)).await.unwrap();
        assert_eq!(recorded, DrawRecordOutcome::Inserted);

        let second = p.container.api.generate_predictions(1, None).await.unwrap();
        assert_eq!(second.batch.combinations, vec![combo(B)]);
        assert_eq!(second.batch.target_draw, Some(1122));
        assert_eq!(p.container.metrics.snapshot().rejected_historical, 1);
        assert_eq!(p.store.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_draw_number_keeps_first_result() {
        let p = PipelineBuilder::new().draws([draw(1120, A)]).build();

        let outcome = p.container.api.record_draw(draw(1120, B)).await.unwrap();

        assert_eq!(outcome, DrawRecordOutcome::AlreadyRecorded);
        let report = p.container.api.check_combination(&combo(A)).await.unwrap();
        assert!(report.previously_drawn);
        let report = p.container.api.check_combination(&combo(B)).await.unwrap();
        assert!(!report.previously_drawn);
    }

    // =========================================================================
    // COMPARE
    // =========================================================================

    #[tokio::test]
    async fn test_predictions_scored_after_draw_is_recorded() {
        let near = [3, 11, 19, 27, 36, 44];
        let p = PipelineBuilder::new()
            .draws([draw(1120, [1, 9, 17, 25, 33, 41])])
            .script([combo(B), combo(near), combo(A)])
            .build();
        let api = &p.container.api;
        let alice = Some(RequesterId::new("alice"));

        api.generate_predictions(1, alice.clone()).await.unwrap();
        api.generate_predictions(2, Some(RequesterId::new("bob"))).await.unwrap();

        let pending = api.compare_draw(1121, None).await.unwrap_err();
        assert!(matches!(pending, GenerationError::DrawNotFound(1121)));

        api.record_draw(draw(1121, A)).await.unwrap();

        let comparison = api.compare_draw(1121, None).await.unwrap();
        let ranked: Vec<_> = comparison
            .matches
            .iter()
            .map(|m| (m.combination, m.match_count, m.rank))
            .collect();
        assert_eq!(
            ranked,
            vec![
                (combo(A), 6, Some(PrizeRank::First)),
                (combo(near), 4, Some(PrizeRank::Fourth)),
                (combo(B), 0, None),
            ]
        );

        let mine = api.compare_draw(1121, alice).await.unwrap();
        assert_eq!(mine.matches.len(), 1);
        assert_eq!(mine.matches[0].combination, combo(B));
    }

    // =========================================================================
    // FAILURE PATHS
    // =========================================================================

    #[tokio::test]
    async fn test_out_of_range_count_has_no_side_effects() {
        let p = PipelineBuilder::new().build();

        for count in [0, 21] {
            let err = p.container.api.generate_predictions(count, None).await.unwrap_err();
            assert!(matches!(err, GenerationError::Validation { requested, .. } if requested == count));
        }

        assert_eq!(p.sampler.draws(), 0);
        assert_eq!(p.store.list_calls(), 0);
        assert!(p.store.persisted().is_empty());
        assert!(p.channel.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_history_fails_before_sampling() {
        let p = PipelineBuilder::new().build();
        p.store.set_offline(true);

        let err = p.container.api.generate_predictions(5, None).await.unwrap_err();

        assert!(matches!(
            err,
            GenerationError::DataUnavailable(DataError::ConnectionError(_))
        ));
        assert_eq!(p.sampler.draws(), 0);
        assert!(p.channel.sent().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_history_is_reported() {
        let p = PipelineBuilder::new().draws([draw(1, A)]).build();
        p.store.insert_raw_record(HistoricalRecord {
            draw_no: 2,
            draw_date: chrono::NaiveDate::from_ymd_opt(2002, 12, 14).unwrap(),
            numbers: vec![4, 4, 9, 16, 25, 36],
        });

        let err = p.container.api.generate_predictions(1, None).await.unwrap_err();

        assert!(matches!(
            err,
            GenerationError::DataUnavailable(DataError::IntegrityError { draw_no: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_exhausted_batch_is_all_or_nothing() {
        let p = PipelineBuilder::new()
            .script([combo(A)])
            .generation(
                GenerationConfigBuilder::new()
                    .max_retries_per_slot(10)
                    .build()
                    .unwrap(),
            )
            .build();

        let err = p.container.api.generate_predictions(3, None).await.unwrap_err();

        assert!(matches!(
            err,
            GenerationError::GenerationExhausted {
                slot: 1,
                attempts: 10
            }
        ));
        // One accepted draw plus ten rejected ones.
        assert_eq!(p.sampler.draws(), 11);
        assert!(p.store.persisted().is_empty());
        assert!(p.channel.sent().is_empty());
        assert_eq!(p.container.metrics.snapshot().batches_failed, 1);
    }

    #[tokio::test]
    async fn test_persist_failure_still_returns_and_notifies() {
        let p = PipelineBuilder::new().build();
        p.store.set_writes_failing(true);

        let outcome = p.container.api.generate_predictions(3, None).await.unwrap();

        assert_eq!(outcome.batch.len(), 3);
        assert_eq!(outcome.record_id, None);
        assert!(outcome.notified);
        assert_eq!(p.container.metrics.snapshot().persist_failures, 1);
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_persisted_batch() {
        let p = PipelineBuilder::new().build();
        p.channel.fail_with_status(502);

        let outcome = p.container.api.generate_predictions(3, None).await.unwrap();

        assert!(!outcome.notified);
        assert!(outcome.record_id.is_some());
        assert_eq!(p.store.persisted().len(), 1);
        assert_eq!(p.container.metrics.snapshot().notifications_failed, 1);
    }

    // =========================================================================
    // CACHE LIFETIME
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_history_reloads_only_after_ttl() {
        let p = PipelineBuilder::new()
            .generation(
                GenerationConfigBuilder::new()
                    .historical_ttl(Duration::from_secs(60))
                    .build()
                    .unwrap(),
            )
            .build();

        p.container.api.generate_predictions(1, None).await.unwrap();
        p.container.api.generate_predictions(1, None).await.unwrap();
        assert_eq!(p.store.list_calls(), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        p.container.api.generate_predictions(1, None).await.unwrap();
        assert_eq!(p.store.list_calls(), 2);
    }
}
