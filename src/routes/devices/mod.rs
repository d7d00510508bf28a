mod handlers;
mod types;

pub use handlers::{
    create_device, delete_device, get_device, list_device_sensors, list_devices, update_device,
};
pub use types::{DeviceRequest, DeviceResponse};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_device, __path_delete_device, __path_get_device, __path_list_device_sensors,
    __path_list_devices, __path_update_device,
};
