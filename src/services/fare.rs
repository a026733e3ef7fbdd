//! Segment fares from route stop distances.

use crate::{
    config::FareConfig,
    error::{AppError, Result},
    models::RouteStopView,
};

/// A priced journey between two stops of one route
#[derive(Debug, Clone, PartialEq)]
pub struct FareQuote {
    /// Canonical stop names as stored
    pub from: String,
    pub to: String,
    pub segment_km: f64,
    pub seats: i64,
    pub per_seat_paise: i64,
    pub total_paise: i64,
}

#[derive(Clone, Debug)]
pub struct FareCalculator {
    config: FareConfig,
}

impl FareCalculator {
    pub fn new(config: FareConfig) -> Self {
        Self { config }
    }

    pub fn base_fare_paise(&self) -> i64 {
        self.config.base_fare_paise
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    /// Nominal fare of a whole route, `km * rate`
    pub fn route_fare_paise(&self, distance_km: f64) -> i64 {
        (distance_km * self.config.rate_per_km_paise as f64).round() as i64
    }

    /// `max(base, km * rate)`, rounded to the paisa
    pub fn per_seat_paise(&self, segment_km: f64) -> i64 {
        let by_distance = (segment_km * self.config.rate_per_km_paise as f64).round() as i64;
        by_distance.max(self.config.base_fare_paise)
    }

    /// Defaults to one seat; rejects anything outside `1..=max`
    pub fn check_seats(&self, seats: Option<i64>) -> Result<i64> {
        let seats = seats.unwrap_or(1);
        let max = self.config.max_seats_per_booking;
        if !(1..=max).contains(&seats) {
            return Err(AppError::validation(
                "seats",
                format!("must be between 1 and {max}"),
            ));
        }
        Ok(seats)
    }

    /// Prices `seats` seats from `from` to `to`. Stops are matched
    /// case-insensitively and must appear on the route in travel order.
    pub fn quote(
        &self,
        stops: &[RouteStopView],
        from: &str,
        to: &str,
        seats: i64,
    ) -> Result<FareQuote> {
        let (from_stop, to_stop) = segment(stops, from, to)?;
        let segment_km = (to_stop.distance_from_start - from_stop.distance_from_start).max(0.0);
        let per_seat_paise = self.per_seat_paise(segment_km);
        let total_paise = per_seat_paise
            .checked_mul(seats)
            .ok_or_else(|| AppError::validation("seats", "fare is out of range"))?;

        Ok(FareQuote {
            from: from_stop.name.clone(),
            to: to_stop.name.clone(),
            segment_km,
            seats,
            per_seat_paise,
            total_paise,
        })
    }
}

/// Position of a stop on an ordered route, matching names case-insensitively
pub fn stop_index(stops: &[RouteStopView], name: &str) -> Option<usize> {
    let name = name.trim();
    stops.iter().position(|s| s.name.eq_ignore_ascii_case(name))
}

fn segment<'a>(
    stops: &'a [RouteStopView],
    from: &str,
    to: &str,
) -> Result<(&'a RouteStopView, &'a RouteStopView)> {
    let from_idx = stop_index(stops, from)
        .ok_or_else(|| AppError::validation("from", format!("'{from}' is not on this route")))?;
    let to_idx = stop_index(stops, to)
        .ok_or_else(|| AppError::validation("to", format!("'{to}' is not on this route")))?;

    if to_idx <= from_idx {
        return Err(AppError::validation(
            "to",
            format!("'{to}' does not come after '{from}' on this route"),
        ));
    }
    Ok((&stops[from_idx], &stops[to_idx]))
}
