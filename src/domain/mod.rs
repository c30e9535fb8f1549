// Domain layer: the bar model and the ports (store, config, views) the service depends on.

pub mod model;
pub mod ports;
