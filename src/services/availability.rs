//! Which scheduled buses run from one stop to another.

use crate::{
    db::Database,
    error::{AppError, Result},
    models::{AvailableBus, RouteStopView, ScheduleDetail},
    services::fare::stop_index,
};
use chrono::NaiveTime;
use std::collections::HashMap;

/// Accepts "HH:MM" and "HH:MM:SS"
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Matches schedules against a stop pair.
///
/// A schedule qualifies when its route calls at `from` and, if `to` is
/// given, calls at `to` strictly later. Without `to` the journey runs to the
/// route's terminus. Results are ordered by departure time, then route.
pub fn find_available(
    schedules: &[ScheduleDetail],
    stops_by_route: &HashMap<i64, Vec<RouteStopView>>,
    from: &str,
    to: Option<&str>,
    after: Option<NaiveTime>,
) -> Vec<AvailableBus> {
    let mut matches: Vec<(&ScheduleDetail, AvailableBus)> = schedules
        .iter()
        .filter(|s| after.is_none_or(|after| s.departure_time >= after))
        .filter_map(|schedule| {
            let stops = stops_by_route.get(&schedule.route_id)?;
            let from_idx = stop_index(stops, from)?;

            let to_name = match to {
                Some(to) => {
                    let to_idx = stop_index(stops, to)?;
                    if to_idx <= from_idx {
                        return None;
                    }
                    stops[to_idx].name.clone()
                }
                None => schedule.destination.clone(),
            };

            Some((
                schedule,
                AvailableBus {
                    route_no: schedule.route_no.clone(),
                    from: stops[from_idx].name.clone(),
                    to: to_name,
                    bus_type: schedule.category.clone(),
                    time: schedule.departure_time.format("%I:%M %p").to_string(),
                    schedule_id: schedule.id,
                    bus_id: schedule.bus_code.clone(),
                    available_seats: schedule.available_seats,
                },
            ))
        })
        .collect();

    matches.sort_by(|(a, _), (b, _)| {
        a.departure_time
            .cmp(&b.departure_time)
            .then_with(|| a.route_no.cmp(&b.route_no))
    });
    matches.into_iter().map(|(_, bus)| bus).collect()
}

/// Loads candidate schedules and their route stops, then matches them
pub async fn available_buses(
    db: &Database,
    from: &str,
    to: Option<&str>,
    after: Option<&str>,
) -> Result<Vec<AvailableBus>> {
    let after = match after.map(str::trim).filter(|a| !a.is_empty()) {
        Some(raw) => Some(
            parse_clock_time(raw)
                .ok_or_else(|| AppError::validation("after", "expected HH:MM"))?,
        ),
        None => None,
    };
    let to = to.map(str::trim).filter(|t| !t.is_empty());

    let schedules = db.schedules_through_stop(from.trim()).await?;

    let mut stops_by_route = HashMap::new();
    for schedule in &schedules {
        if !stops_by_route.contains_key(&schedule.route_id) {
            let stops = db.route_stops(schedule.route_id).await?;
            stops_by_route.insert(schedule.route_id, stops);
        }
    }

    Ok(find_available(&schedules, &stops_by_route, from, to, after))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: i64, name: &str, order: i64, km: f64) -> RouteStopView {
        RouteStopView {
            id,
            name: name.to_string(),
            stop_order: order,
            distance_from_start: km,
        }
    }

    fn schedule(id: i64, route_id: i64, route_no: &str, dest: &str, time: &str) -> ScheduleDetail {
        ScheduleDetail {
            id,
            route_id,
            route_no: route_no.to_string(),
            destination: dest.to_string(),
            bus_code: format!("BUS{id}"),
            category: "AC".to_string(),
            departure_time: parse_clock_time(time).unwrap(),
            available_seats: 40,
        }
    }

    fn fixture() -> (Vec<ScheduleDetail>, HashMap<i64, Vec<RouteStopView>>) {
        let mut stops = HashMap::new();
        stops.insert(
            1,
            vec![
                stop(1, "Majestic", 0, 0.0),
                stop(2, "Hebbal", 1, 10.0),
                stop(3, "Airport", 2, 35.0),
            ],
        );
        stops.insert(
            2,
            vec![
                stop(3, "Airport", 0, 0.0),
                stop(2, "Hebbal", 1, 25.0),
                stop(1, "Majestic", 2, 35.0),
            ],
        );
        let schedules = vec![
            schedule(10, 1, "KIA-9", "Airport", "09:15"),
            schedule(11, 2, "KIA-10", "Majestic", "07:00"),
            schedule(12, 1, "KIA-9", "Airport", "06:30"),
            schedule(13, 2, "KIA-10", "Majestic", "09:15"),
        ];
        (schedules, stops)
    }

    #[test]
    fn test_direction_is_respected() {
        let (schedules, stops) = fixture();
        let buses = find_available(&schedules, &stops, "Majestic", Some("Airport"), None);
        let ids: Vec<i64> = buses.iter().map(|b| b.schedule_id).collect();
        assert_eq!(ids, vec![12, 10]);
        assert!(buses.iter().all(|b| b.to == "Airport"));
    }

    #[test]
    fn test_without_destination_runs_to_terminus() {
        let (schedules, stops) = fixture();
        let buses = find_available(&schedules, &stops, "hebbal", None, None);
        assert_eq!(buses.len(), 4);
        assert_eq!(buses[0].from, "Hebbal");
        assert_eq!(buses[0].to, "Airport");
        assert_eq!(buses[1].to, "Majestic");
    }

    #[test]
    fn test_ties_broken_by_route_number() {
        let (schedules, stops) = fixture();
        let buses = find_available(&schedules, &stops, "Hebbal", None, parse_clock_time("09:00"));
        let routes: Vec<&str> = buses.iter().map(|b| b.route_no.as_str()).collect();
        assert_eq!(routes, vec!["KIA-10", "KIA-9"]);
    }

    #[test]
    fn test_after_is_inclusive() {
        let (schedules, stops) = fixture();
        let buses = find_available(
            &schedules,
            &stops,
            "Majestic",
            Some("Airport"),
            parse_clock_time("09:15"),
        );
        assert_eq!(buses.len(), 1);
        assert_eq!(buses[0].schedule_id, 10);
        assert_eq!(buses[0].time, "09:15 AM");
    }

    #[test]
    fn test_unknown_destination_yields_nothing() {
        let (schedules, stops) = fixture();
        assert!(find_available(&schedules, &stops, "Majestic", Some("Mysore"), None).is_empty());
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(
            parse_clock_time("18:05"),
            NaiveTime::from_hms_opt(18, 5, 0)
        );
        assert_eq!(
            parse_clock_time("18:05:30"),
            NaiveTime::from_hms_opt(18, 5, 30)
        );
        assert_eq!(parse_clock_time("6pm"), None);
    }
}
