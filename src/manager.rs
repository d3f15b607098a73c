use crate::device::Device;
use crate::event::{Flow, PlatformEvent};
use crate::unified::UnifiedInput;
use log::{debug, info};

/// Owns a set of [`Device`]s and drains them once per cycle.
#[derive(Default)]
pub struct DeviceManager {
    devices: Vec<Box<dyn Device>>,
}

impl DeviceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager preloaded with every backend enabled at compile time.
    pub fn discover() -> Self {
        let mut manager = Self::new();
        let found = crate::backends::probe_devices();
        info!("Discovered {} input device(s)", found.len());
        manager.devices.extend(found);
        manager
    }

    pub fn add_device<D: Device + 'static>(&mut self, device: D) {
        debug!("Added device {} ({})", device.id(), device.name());
        self.devices.push(Box::new(device));
    }

    pub fn remove_device(&mut self, id: &str) -> bool {
        let before = self.devices.len();
        self.devices.retain(|d| d.id() != id);
        before != self.devices.len()
    }

    pub fn device_ids(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(|d| d.id())
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Polls every device in insertion order.
    pub fn poll_all(&mut self) -> Vec<PlatformEvent> {
        let mut events = Vec::new();
        for device in self.devices.iter_mut() {
            events.extend(device.poll());
        }
        events
    }

    /// Polls every device and hands the events to `input`.
    ///
    /// Does not call [`UnifiedInput::update`]; the caller still decides where the
    /// cycle boundary is. Returns the number of events delivered.
    pub fn pump(&mut self, input: &mut UnifiedInput) -> usize {
        let events = self.poll_all();
        let mut flow = Flow::Continue;
        for event in &events {
            flow = flow.merge(input.handle_event(event));
        }
        if flow.is_default_prevented() {
            debug!("pump: default action suppressed");
        }
        events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::{VirtualGamepad, VirtualKeyboardMouse};
    use crate::config::InputConfig;

    #[test]
    fn poll_all_drains_in_order() {
        let mut kbm = VirtualKeyboardMouse::new("virtual:kbm", "Keyboard");
        kbm.key_down("a");
        kbm.key_up("a");

        let mut manager = DeviceManager::new();
        manager.add_device(kbm);
        assert_eq!(manager.len(), 1);

        let events = manager.poll_all();
        assert_eq!(
            events,
            vec![PlatformEvent::key_down("a"), PlatformEvent::key_up("a")]
        );
        assert!(manager.poll_all().is_empty());
    }

    #[test]
    fn pump_feeds_unified_input() {
        let mut pad = VirtualGamepad::new("virtual:pad0", "Pad");
        pad.connect();
        pad.press(0);

        let mut manager = DeviceManager::new();
        manager.add_device(pad);

        let mut input = UnifiedInput::new(&InputConfig::default()).unwrap();
        assert_eq!(manager.pump(&mut input), 2);
        assert!(input.gamepad().is_connected());

        input.update();
        assert!(input.pressed().is("gpButton0"));
    }

    #[test]
    fn remove_by_id() {
        let mut manager = DeviceManager::new();
        manager.add_device(VirtualGamepad::new("virtual:pad0", "Pad"));
        manager.add_device(VirtualKeyboardMouse::new("virtual:kbm", "Keyboard"));
        assert!(manager.remove_device("virtual:pad0"));
        assert!(!manager.remove_device("virtual:pad0"));
        assert_eq!(manager.device_ids().collect::<Vec<_>>(), vec!["virtual:kbm"]);
    }
}
