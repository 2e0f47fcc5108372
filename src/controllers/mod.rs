//! Handler groups shipped with the device.
use crate::router::{RouteError, RouteTable};

pub mod clock;
pub mod say;

pub use clock::ClockController;
pub use say::SayController;

/// Route table with every shipped handler group registered.
pub fn routes() -> Result<RouteTable, RouteError> {
    RouteTable::new()
        .with_controller::<SayController>()?
        .with_controller::<ClockController>()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_routes() {
        let routes = routes().unwrap();
        let mut keys: Vec<String> = routes.keys().map(|k| k.to_string()).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["GET /clock", "GET /clock/quiet", "GET /say", "GET /say/time"]
        );
    }
}
