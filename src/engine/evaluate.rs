//! Threshold evaluation: ATH tracking, daily band crossings, and
//! calendar-triggered summary windows.
//!
//! Everything here is pure over `(&mut PersistedState, price, calendar)`;
//! all I/O (fetching, notifying, persisting) stays with the caller.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Weekday};

use crate::market::MarketSnapshot;
use crate::state::PersistedState;

use super::events::Event;

/// Relative guard against float noise when comparing to the recorded ATH.
pub const ATH_EPSILON: f64 = 5e-7;

/// Absolute guard when comparing a percentage move to a band threshold.
pub const BAND_EPSILON: f64 = 1e-9;

/// Seed the record on the first-ever run.
///
/// The caller persists immediately afterwards and ends the run early; no
/// further checks happen on an initialization run.
pub fn initialize(
    state: &mut PersistedState,
    price: f64,
    seeded_ath: Option<f64>,
    today: NaiveDate,
) -> Event {
    state.initialized = true;
    state.ath = seeded_ath.unwrap_or(price).max(price);
    state.daily_baseline = price;
    state.daily_baseline_date = Some(today);
    state.triggered_bands.clear();
    state.last_weekly_summary = None;
    state.last_monthly_summary = None;
    state.prev_month_eom_price = None;
    state.last_price = price;

    Event::Initialized { price, ath: state.ath }
}

/// One evaluation pass over an initialized record: daily rollover, ATH
/// check, band crossing. Returns the events to notify, in emission order.
///
/// An ATH breach does not reset the daily baseline, so a run that sets a
/// new high can still fire the band the same move crossed.
pub fn evaluate_tick(
    state: &mut PersistedState,
    price: f64,
    today: NaiveDate,
    bands: &[u32],
) -> Vec<Event> {
    let mut events = Vec::new();

    // Daily rollover: new calendar day, new baseline, bands re-armed.
    if state.daily_baseline_date != Some(today) {
        state.daily_baseline = price;
        state.daily_baseline_date = Some(today);
        state.triggered_bands.clear();
    }

    if price > state.ath * (1.0 + ATH_EPSILON) {
        state.ath = price;
        events.push(Event::NewAth { price });
    }

    if state.daily_baseline > 0.0 {
        let pct = (price - state.daily_baseline) / state.daily_baseline * 100.0;
        if let Some(band) = crossed_band(pct, bands, state) {
            state.triggered_bands.insert(band);
            events.push(Event::BandCrossed {
                band,
                pct,
                price,
                baseline: state.daily_baseline,
                ath: state.ath,
            });
        }
    }

    events
}

/// The deepest band the move has reached that has not fired today.
///
/// Scanning descending means a move that jumps straight past several bands
/// alerts once, at the widest band it reached; one band per run, one shot
/// per band per day.
fn crossed_band(pct: f64, bands: &[u32], state: &PersistedState) -> Option<u32> {
    bands
        .iter()
        .rev()
        .find(|&&b| pct.abs() >= f64::from(b) - BAND_EPSILON && !state.triggered_bands.contains(&b))
        .copied()
}

/// Whether the weekly summary window is open and still unclaimed today.
pub fn weekly_summary_due(
    state: &PersistedState,
    now: &DateTime<FixedOffset>,
    weekday: Weekday,
    hour: u32,
) -> bool {
    now.weekday() == weekday
        && now.hour() == hour
        && state.last_weekly_summary != Some(now.date_naive())
}

/// Whether the monthly summary window is open and still unclaimed today.
/// Fires on the last day of the month, so the reported price is the EOM
/// snapshot.
pub fn monthly_summary_due(state: &PersistedState, now: &DateTime<FixedOffset>, hour: u32) -> bool {
    is_last_day_of_month(now.date_naive())
        && now.hour() == hour
        && state.last_monthly_summary != Some(now.date_naive())
}

/// True when the given date is the last calendar day of its month.
pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    match date.succ_opt() {
        Some(next) => next.month() != date.month(),
        None => true,
    }
}

/// Claim today's weekly window and build the recap event.
pub fn apply_weekly_summary(
    state: &mut PersistedState,
    price: f64,
    snapshot: &MarketSnapshot,
    today: NaiveDate,
) -> Event {
    state.last_weekly_summary = Some(today);

    let ath_delta_pct = if state.ath > 0.0 {
        (price - state.ath) / state.ath * 100.0
    } else {
        0.0
    };

    Event::WeeklySummary {
        price,
        ath: state.ath,
        ath_delta_pct,
        change_7d: snapshot.change_7d,
        change_30d: snapshot.change_30d,
    }
}

/// Claim today's monthly window, build the recap event, and record this
/// price as the month-end snapshot for the next MoM delta.
pub fn apply_monthly_summary(
    state: &mut PersistedState,
    price: f64,
    snapshot: &MarketSnapshot,
    today: NaiveDate,
) -> Event {
    let prev_eom_price = state.prev_month_eom_price.filter(|&p| p > 0.0);
    let mom_pct = prev_eom_price.map(|prev| (price - prev) / prev * 100.0);

    state.prev_month_eom_price = Some(price);
    state.last_monthly_summary = Some(today);

    Event::MonthlySummary {
        price,
        prev_eom_price,
        mom_pct,
        market_cap: snapshot.market_cap,
        circulating_supply: snapshot.circulating_supply,
    }
}
