use crate::config::DelayRange;
use rand::Rng;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Draws a duration uniformly from the range
pub fn random_delay(range: DelayRange) -> Duration {
    let secs = if range.max_secs() <= range.min_secs() {
        range.min_secs()
    } else {
        rand::thread_rng().gen_range(range.min_secs()..=range.max_secs())
    };
    Duration::try_from_secs_f64(secs).unwrap_or_else(|e| {
        ::log::warn!("Ignoring unusable delay of {} seconds: {}", secs, e);
        Duration::ZERO
    })
}

/// Picks a user agent from the pool, skipping blank entries
pub fn pick_user_agent(pool: &[String]) -> Option<&str> {
    let candidates: Vec<&String> = pool.iter().filter(|ua| !ua.trim().is_empty()).collect();
    candidates
        .choose(&mut rand::thread_rng())
        .copied()
        .map(String::as_str)
}
