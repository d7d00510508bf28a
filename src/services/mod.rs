pub mod devices;
pub mod sensors;

pub use devices::{DeviceService, DeviceWithSensors};
pub use sensors::SensorService;
