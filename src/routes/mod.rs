pub mod maintenance_routes;
pub mod reminder_routes;
pub mod vehicle_routes;
