//! Notification events produced by the threshold engine, and their
//! webhook message rendering.

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::format::{fmt_amount, fmt_pct, fmt_usd};

/// A single notification produced by one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// First-ever run: baseline and ATH were seeded.
    Initialized {
        /// Observed price, now the daily baseline.
        price: f64,
        /// Seeded all-time high.
        ath: f64,
    },

    /// Price exceeded the recorded all-time high.
    NewAth {
        /// The new high.
        price: f64,
    },

    /// Today's move crossed a percentage band.
    BandCrossed {
        /// The band that fired, in percent.
        band: u32,
        /// Signed percentage move against the daily baseline.
        pct: f64,
        /// Current price.
        price: f64,
        /// Daily baseline the move is measured from.
        baseline: f64,
        /// Current all-time high.
        ath: f64,
    },

    /// Scheduled weekly market recap.
    WeeklySummary {
        /// Current price.
        price: f64,
        /// Recorded all-time high.
        ath: f64,
        /// Signed percentage distance from the ATH.
        ath_delta_pct: f64,
        /// 7-day percentage change.
        change_7d: f64,
        /// 30-day percentage change.
        change_30d: f64,
    },

    /// Scheduled month-end market recap.
    MonthlySummary {
        /// End-of-month price.
        price: f64,
        /// Previous month-end price, when one was recorded.
        prev_eom_price: Option<f64>,
        /// Month-over-month percentage change, when computable.
        mom_pct: Option<f64>,
        /// Market capitalization.
        market_cap: f64,
        /// Circulating supply in coin units.
        circulating_supply: f64,
    },
}

impl Event {
    /// Render the webhook message for this event.
    pub fn render(&self, now: &DateTime<FixedOffset>) -> String {
        let ts = now.to_rfc3339_opts(SecondsFormat::Secs, false);

        match self {
            Event::Initialized { price, ath } => format!(
                "🟢 Price watch initialized {ts} — baseline {}, ATH {}",
                fmt_usd(*price),
                fmt_usd(*ath),
            ),

            Event::NewAth { price } => {
                format!("🚀 NEW ATH: {} at {ts}", fmt_usd(*price))
            }

            Event::BandCrossed { band, pct, price, baseline, ath } => {
                let (emoji, direction) = if *pct > 0.0 {
                    ("📈", "▲ up")
                } else {
                    ("📉", "▼ down")
                };
                format!(
                    "{emoji} {direction} {:.1}% (band {band}%) — {} at {ts}\n\
                     Baseline was {} • ATH {}",
                    pct.abs(),
                    fmt_usd(*price),
                    fmt_usd(*baseline),
                    fmt_usd(*ath),
                )
            }

            Event::WeeklySummary { price, ath, ath_delta_pct, change_7d, change_30d } => format!(
                "📊 Weekly recap — {}\n\
                 ATH {} ({} from high)\n\
                 7d {} • 30d {}",
                fmt_usd(*price),
                fmt_usd(*ath),
                fmt_pct(*ath_delta_pct),
                fmt_pct(*change_7d),
                fmt_pct(*change_30d),
            ),

            Event::MonthlySummary { price, prev_eom_price, mom_pct, market_cap, circulating_supply } => {
                let mut msg = format!("🗓️ Month-end recap — {}", fmt_usd(*price));
                if let (Some(prev), Some(mom)) = (prev_eom_price, mom_pct) {
                    msg.push_str(&format!(
                        "\nPrev month-end {} (MoM {})",
                        fmt_usd(*prev),
                        fmt_pct(*mom),
                    ));
                }
                msg.push_str(&format!(
                    "\nMarket cap {} • Circulating {}",
                    fmt_usd(*market_cap),
                    fmt_amount(*circulating_supply),
                ));
                msg
            }
        }
    }
}
