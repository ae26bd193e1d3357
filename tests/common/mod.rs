//! Synthetic network shared by the integration and property tests.

#![allow(dead_code)]

use u_multimodal::graph::{Graph, GraphBuilder, GraphConfig};
use u_multimodal::schedule::{
    FareAttribute, RouteRecord, ScheduleData, StopRecord, StopTimeRecord, Timestamp, TripRecord,
};

pub const LAT0: f64 = 41.140;
pub const LON0: f64 = -8.620;
/// About 300 m in both directions at this latitude.
pub const STEP_LAT: f64 = 0.0027;
pub const STEP_LON: f64 = 0.0036;

const BUS_HOP_S: Timestamp = 90;
const METRO_HOP_S: Timestamp = 120;

/// `n × n` bus grid with one eastbound route per row and one northbound
/// route per column, plus a diagonal metro line. Neighbouring stops are
/// within walking radius. Zones grow along the diagonal.
pub fn grid_schedule(n: usize) -> ScheduleData {
    let mut data = ScheduleData::default();

    for r in 0..n {
        for c in 0..n {
            data.stops.push(
                StopRecord::new(&bus_stop(r, c), "STCP", lat(r), lon(c))
                    .with_name(&format!("Rua {r}-{c}"))
                    .with_zone(&zone(r, c)),
            );
        }
    }
    for k in 0..n {
        data.stops.push(
            StopRecord::new(&metro_stop(k), "METRO", lat(k) + 0.0001, lon(k))
                .with_name(&format!("Estação {k}"))
                .with_zone(&zone(k, k)),
        );
    }

    for r in 0..n {
        let stops: Vec<String> = (0..n).map(|c| bus_stop(r, c)).collect();
        add_route(&mut data, &format!("row{r}"), "STCP", 3, &stops, BUS_HOP_S, &[0, 600]);
    }
    for c in 0..n {
        let stops: Vec<String> = (0..n).map(|r| bus_stop(r, c)).collect();
        add_route(&mut data, &format!("col{c}"), "STCP", 3, &stops, BUS_HOP_S, &[0, 900]);
    }
    let line: Vec<String> = (0..n).map(metro_stop).collect();
    add_route(&mut data, "M", "METRO", 1, &line, METRO_HOP_S, &[0, 300, 600]);

    for zones in 1..=4 {
        data.fare_attributes.push(FareAttribute {
            fare_id: format!("Z{zones}"),
            price: 1.0 + 0.4 * zones as f64,
            currency: "EUR".into(),
        });
    }

    data
}

pub fn grid_graph(n: usize) -> Graph {
    GraphBuilder::new(GraphConfig::default())
        .build(&grid_schedule(n))
        .expect("grid builds")
}

pub fn bus_stop(r: usize, c: usize) -> String {
    format!("B{r}_{c}")
}

pub fn metro_stop(k: usize) -> String {
    format!("M{k}")
}

pub fn lat(r: usize) -> f64 {
    LAT0 + r as f64 * STEP_LAT
}

pub fn lon(c: usize) -> f64 {
    LON0 + c as f64 * STEP_LON
}

fn zone(r: usize, c: usize) -> String {
    format!("Z{}", (r + c) / 3)
}

fn add_route(
    data: &mut ScheduleData,
    route_id: &str,
    operator: &str,
    route_type: u16,
    stops: &[String],
    hop_s: Timestamp,
    departures: &[Timestamp],
) {
    data.routes.push(RouteRecord::new(route_id, operator, route_type));
    for (t, &start) in departures.iter().enumerate() {
        let trip_id = format!("{route_id}_{t}");
        data.trips.push(TripRecord::new(&trip_id, route_id, operator));
        for (seq, stop) in stops.iter().enumerate() {
            let at = start + seq as Timestamp * hop_s;
            data.stop_times.push(StopTimeRecord::new(
                operator,
                &trip_id,
                stop,
                seq as u32 + 1,
                Some(at),
                Some(at),
            ));
        }
    }
}
