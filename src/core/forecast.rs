use crate::domain::model::ForecastResult;

/// Number of trailing months in the moving average window.
pub const FORECAST_WINDOW: usize = 3;
/// Multiplier applied to the average when demand is trending up.
pub const UPWARD_TREND_UPLIFT: f64 = 1.1;

/// Predicts next month's leave count from monthly counts ordered oldest first.
///
/// Only the last three months are used. With fewer than three months the
/// all-zero [`ForecastResult::INSUFFICIENT`] is returned.
pub fn predict_next_month_leaves(history: &[u32]) -> ForecastResult {
    if history.len() < FORECAST_WINDOW {
        tracing::debug!(months = history.len(), "not enough leave history to forecast");
        return ForecastResult::INSUFFICIENT;
    }

    let window = &history[history.len() - FORECAST_WINDOW..];
    let (oldest, newest) = (window[0], window[FORECAST_WINDOW - 1]);

    let sma = window.iter().map(|&count| f64::from(count)).sum::<f64>() / FORECAST_WINDOW as f64;
    let trend_increasing = newest > oldest;
    let predicted = if trend_increasing {
        sma * UPWARD_TREND_UPLIFT
    } else {
        sma
    };

    ForecastResult {
        sma,
        predicted,
        trend_increasing,
    }
}
