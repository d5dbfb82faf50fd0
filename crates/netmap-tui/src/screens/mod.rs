//! Screen implementations. Each screen is a top-level Component.

pub mod device;
pub mod topology;

use netmap_core::Controller;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar.
pub fn create_screens(controller: &Controller) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Topology,
            Box::new(topology::TopologyScreen::new()),
        ),
        (
            ScreenId::Device,
            Box::new(device::DeviceScreen::new(controller.clone())),
        ),
    ]
}
