//! Scoring module - triangular match bonus and slide penalty
//!
//! Both rules use the same curve: covering `k` cells is worth `k(k+1)/2`.
//! A match spanning line distance `k` adds it; a slide with net displacement
//! `n` subtracts it, floored at zero.

/// Triangular number `k(k+1)/2`
pub fn triangular(k: u32) -> u32 {
    k.saturating_mul(k.saturating_add(1)) / 2
}

/// Points awarded for a match whose tiles are `distance` cells apart
pub fn match_bonus(distance: u32) -> u32 {
    triangular(distance)
}

/// Points deducted for a slide with net displacement `distance`
pub fn slide_penalty(distance: u32) -> u32 {
    triangular(distance)
}

/// Subtract a penalty without going below zero
pub fn apply_penalty(score: u32, penalty: u32) -> u32 {
    score.saturating_sub(penalty)
}
