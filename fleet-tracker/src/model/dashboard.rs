//! Per-route summary the dashboard renders above the vehicle list

use chrono::Utc;
use serde::Serialize;

use super::vehicle::{Vehicle, VehicleStatus};

/// Counts for one route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStatus {
    pub route: String,
    pub total_vehicles: usize,
    pub in_transit: usize,
    pub delivered: usize,
    pub delayed: usize,
    /// Delivered within the planned arrival time
    pub on_time: usize,
}

impl RouteStatus {
    fn new(route: &str) -> Self {
        Self {
            route: route.to_string(),
            total_vehicles: 0,
            in_transit: 0,
            delivered: 0,
            delayed: 0,
            on_time: 0,
        }
    }

    fn record(&mut self, status: VehicleStatus) {
        self.total_vehicles += 1;
        match status {
            VehicleStatus::InTransit => self.in_transit += 1,
            VehicleStatus::Delivered => {
                self.delivered += 1;
                self.on_time += 1;
            }
            VehicleStatus::Delayed => self.delayed += 1,
            VehicleStatus::Pending | VehicleStatus::Cancelled => {}
        }
    }
}

/// Everything the dashboard shows after one sync
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub vehicles: Vec<Vehicle>,
    pub routes: Vec<RouteStatus>,
    pub last_sync: String,
    pub total_vehicles: usize,
    /// Routes with at least one vehicle on the road
    pub active_routes: usize,
}

impl DashboardData {
    /// Aggregate vehicles by route, keeping routes in first-seen order
    pub fn build(vehicles: Vec<Vehicle>) -> Self {
        let mut routes: Vec<RouteStatus> = Vec::new();

        for vehicle in &vehicles {
            let idx = match routes.iter().position(|r| r.route == vehicle.route) {
                Some(idx) => idx,
                None => {
                    routes.push(RouteStatus::new(&vehicle.route));
                    routes.len() - 1
                }
            };
            routes[idx].record(vehicle.status);
        }

        let active_routes = routes.iter().filter(|r| r.in_transit > 0).count();

        log::debug!(
            "Dashboard built: {} vehicles across {} routes ({} active)",
            vehicles.len(),
            routes.len(),
            active_routes
        );

        Self {
            total_vehicles: vehicles.len(),
            vehicles,
            routes,
            last_sync: Utc::now().to_rfc3339(),
            active_routes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::vehicle::VehicleSchedule;

    fn vehicle(destination: &str, status: VehicleStatus) -> Vehicle {
        Vehicle {
            id: format!("ABC1D23-0-{}", destination),
            isa: String::new(),
            data_carga: String::new(),
            rota_completa: String::new(),
            tipo_veiculo: String::new(),
            planejado_chegada_tzx: String::new(),
            planejado_saida_tzx: String::new(),
            planejado_chegada_fc: destination.to_string(),
            id_viagem: String::new(),
            sm: String::new(),
            caf: String::new(),
            pallets: String::new(),
            vol: String::new(),
            chegada_origem: String::new(),
            saida_origem: String::new(),
            chegada_destino: String::new(),
            finalizado: String::new(),
            baixa_de_caf: String::new(),
            license_plate: "ABC1D23".into(),
            driver_name: "João".into(),
            transport_company: "GARBERG".into(),
            origin_fc: "TZX".into(),
            destination_fc: destination.to_string(),
            schedule: VehicleSchedule::default(),
            status,
            route: Vehicle::route_label("TZX", destination),
            last_update: String::new(),
        }
    }

    #[test]
    fn test_build_groups_by_route_in_first_seen_order() {
        let data = DashboardData::build(vec![
            vehicle("GR9", VehicleStatus::InTransit),
            vehicle("GR8", VehicleStatus::Delivered),
            vehicle("GR9", VehicleStatus::Delayed),
            vehicle("GR9", VehicleStatus::Pending),
        ]);

        assert_eq!(data.total_vehicles, 4);
        assert_eq!(data.routes.len(), 2);
        assert_eq!(data.routes[0].route, "TZX → GR9");
        assert_eq!(data.routes[0].total_vehicles, 3);
        assert_eq!(data.routes[0].in_transit, 1);
        assert_eq!(data.routes[0].delayed, 1);
        assert_eq!(data.routes[1].route, "TZX → GR8");
        assert_eq!(data.routes[1].delivered, 1);
        assert_eq!(data.routes[1].on_time, 1);
        assert_eq!(data.active_routes, 1);
    }

    #[test]
    fn test_build_empty() {
        let data = DashboardData::build(Vec::new());
        assert_eq!(data.total_vehicles, 0);
        assert!(data.routes.is_empty());
        assert_eq!(data.active_routes, 0);
    }
}
