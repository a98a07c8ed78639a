//! Matching stored predictions against a winning draw

use super::batch::{HistoricalDraw, PredictionBatch, RecordId, RequesterId};
use super::combination::Combination;
use serde::Serialize;

/// Prize tier implied by the number of matched numbers.
///
/// Draws carry no bonus number, so five matches cannot be split into
/// second and third place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrizeRank {
    First,
    SecondOrThird,
    Fourth,
    Fifth,
}

impl PrizeRank {
    pub fn from_matches(matches: usize) -> Option<Self> {
        match matches {
            6 => Some(Self::First),
            5 => Some(Self::SecondOrThird),
            4 => Some(Self::Fourth),
            3 => Some(Self::Fifth),
            _ => None,
        }
    }
}

/// One stored combination scored against the winning numbers
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PredictionMatch {
    pub record_id: RecordId,
    pub requester: Option<RequesterId>,
    pub combination: Combination,
    /// Winning numbers present in `combination`, ascending
    pub matched: Vec<u8>,
    pub match_count: usize,
    pub rank: Option<PrizeRank>,
}

impl PredictionMatch {
    pub fn score(
        record_id: RecordId,
        requester: Option<RequesterId>,
        combination: Combination,
        winning: &Combination,
    ) -> Self {
        let matched: Vec<u8> = combination
            .iter()
            .filter(|&n| winning.contains_number(n))
            .collect();
        let match_count = matched.len();
        Self {
            record_id,
            requester,
            combination,
            matched,
            match_count,
            rank: PrizeRank::from_matches(match_count),
        }
    }
}

/// Every prediction made for one draw, best match first
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DrawComparison {
    pub draw_no: u32,
    pub winning: Combination,
    pub matches: Vec<PredictionMatch>,
}

impl DrawComparison {
    /// Score every combination of `batches`. Ties keep storage order.
    pub fn build(draw: &HistoricalDraw, batches: &[(RecordId, PredictionBatch)]) -> Self {
        let mut matches: Vec<PredictionMatch> = batches
            .iter()
            .flat_map(|(record_id, batch)| {
                batch.combinations.iter().map(move |combination| {
                    PredictionMatch::score(
                        *record_id,
                        batch.requester.clone(),
                        *combination,
                        &draw.combination,
                    )
                })
            })
            .collect();
        matches.sort_by(|a, b| b.match_count.cmp(&a.match_count));

        Self {
            draw_no: draw.draw_no,
            winning: draw.combination,
            matches,
        }
    }

    /// Highest match count, 0 when nothing was predicted
    pub fn best_match(&self) -> usize {
        self.matches.first().map_or(0, |m| m.match_count)
    }
}
