//! Discovers attached lights and fans colors out to them.

use std::time::Duration;

use hidapi::HidApi;

use crate::color::Rgb;
use crate::drivers::{Family, Light};
use crate::error::{BusylightError, BusylightResult};

/// A light as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct LightInfo {
    pub index: usize,
    pub name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub selected: bool,
}

pub struct LightManager {
    lights: Vec<Box<dyn Light>>,
    selected: Vec<usize>,
}

impl LightManager {
    /// Open every supported light currently attached.
    pub fn discover() -> BusylightResult<Self> {
        let api = HidApi::new()?;
        let mut lights: Vec<Box<dyn Light>> = Vec::new();

        for info in api.device_list() {
            let (vid, pid) = (info.vendor_id(), info.product_id());
            let Some(family) = Family::identify(vid, pid) else {
                continue;
            };

            let name = match info.serial_number() {
                Some(serial) if !serial.is_empty() => format!("{} ({})", family.label(), serial),
                _ => family.label().to_string(),
            };

            match info.open_device(&api) {
                Ok(device) => {
                    tracing::debug!("Opened {} at {:?}", name, info.path());
                    lights.push(family.driver(Box::new(device), (vid, pid), name));
                }
                Err(e) => {
                    tracing::warn!("Could not open {}: {}", name, e);
                }
            }
        }

        Ok(Self::from_lights(lights))
    }

    /// Manage an explicit set of lights. All of them start selected.
    pub fn from_lights(lights: Vec<Box<dyn Light>>) -> Self {
        let selected = (0..lights.len()).collect();
        LightManager { lights, selected }
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    /// Restrict output to the given light indices. An empty slice selects
    /// every light.
    pub fn select(&mut self, indices: &[usize]) -> BusylightResult<()> {
        if indices.is_empty() {
            self.selected = (0..self.lights.len()).collect();
            return Ok(());
        }

        if let Some(&index) = indices.iter().find(|&&i| i >= self.lights.len()) {
            return Err(BusylightError::LightIndex {
                index,
                available: self.lights.len(),
            });
        }

        let mut selected = indices.to_vec();
        selected.sort_unstable();
        selected.dedup();
        self.selected = selected;
        Ok(())
    }

    pub fn describe(&self) -> Vec<LightInfo> {
        self.lights
            .iter()
            .enumerate()
            .map(|(index, light)| {
                let (vendor_id, product_id) = light.usb_id();
                LightInfo {
                    index,
                    name: light.name().to_string(),
                    vendor_id,
                    product_id,
                    selected: self.selected.contains(&index),
                }
            })
            .collect()
    }

    /// Show `color` on every selected light. A light that fails is logged
    /// and skipped; this only errors when no light could be updated.
    pub fn apply(&mut self, color: Rgb) -> BusylightResult<usize> {
        if self.selected.is_empty() {
            return Err(BusylightError::NoLightsFound);
        }

        let mut updated = 0;
        for &index in &self.selected {
            let light = &mut self.lights[index];
            match light.set_color(color) {
                Ok(()) => updated += 1,
                Err(e) => tracing::warn!("Failed to update {}: {}", light.name(), e),
            }
        }

        if updated == 0 {
            return Err(BusylightError::AllLightsFailed(self.selected.len()));
        }

        tracing::debug!("Set {} light(s) to {}", updated, color);
        Ok(updated)
    }

    pub fn off(&mut self) -> BusylightResult<usize> {
        self.apply(Rgb::OFF)
    }

    /// Shortest keepalive among the selected lights, if any need one.
    pub fn keepalive_interval(&self) -> Option<Duration> {
        self.selected
            .iter()
            .filter_map(|&i| self.lights[i].keepalive_interval())
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::{Recorder, Report};

    fn light(family: Family, recorder: &Recorder) -> Box<dyn Light> {
        let usb_id = match family {
            Family::Luxafor => (0x04d8, 0xf372),
            Family::Blink1 => (0x27b8, 0x01ed),
            Family::Blynclight => (0x2c0d, 0x0001),
            Family::Kuando => (0x27bb, 0x3bcd),
        };
        family.driver(Box::new(recorder.clone()), usb_id, family.label().to_string())
    }

    #[test]
    fn applies_to_all_lights_by_default() {
        let a = Recorder::default();
        let b = Recorder::default();
        let mut manager =
            LightManager::from_lights(vec![light(Family::Luxafor, &a), light(Family::Blink1, &b)]);

        assert_eq!(manager.apply(Rgb::new(255, 0, 0)).unwrap(), 2);
        assert_eq!(a.taken().len(), 1);
        assert_eq!(b.taken().len(), 1);
    }

    #[test]
    fn applies_only_to_selection() {
        let a = Recorder::default();
        let b = Recorder::default();
        let mut manager =
            LightManager::from_lights(vec![light(Family::Luxafor, &a), light(Family::Luxafor, &b)]);

        manager.select(&[1, 1]).unwrap();
        manager.apply(Rgb::new(0, 0, 255)).unwrap();

        assert!(a.taken().is_empty());
        assert_eq!(
            b.taken(),
            vec![Report::Output(vec![0x00, 0x01, 0xff, 0, 0, 255, 0, 0, 0])]
        );

        let described = manager.describe();
        assert!(!described[0].selected);
        assert!(described[1].selected);
    }

    #[test]
    fn rejects_out_of_range_selection() {
        let mut manager = LightManager::from_lights(vec![light(Family::Luxafor, &Recorder::default())]);

        assert!(matches!(
            manager.select(&[0, 3]),
            Err(BusylightError::LightIndex {
                index: 3,
                available: 1
            })
        ));
    }

    #[test]
    fn one_failing_light_does_not_stop_the_rest() {
        let good = Recorder::default();
        let bad = Recorder::failing();
        let mut manager =
            LightManager::from_lights(vec![light(Family::Luxafor, &bad), light(Family::Luxafor, &good)]);

        assert_eq!(manager.off().unwrap(), 1);
        assert_eq!(good.taken().len(), 1);
    }

    #[test]
    fn errors_when_every_light_fails() {
        let mut manager =
            LightManager::from_lights(vec![light(Family::Blink1, &Recorder::failing())]);

        assert!(matches!(
            manager.apply(Rgb::OFF),
            Err(BusylightError::AllLightsFailed(1))
        ));
    }

    #[test]
    fn empty_manager_reports_no_lights() {
        let mut manager = LightManager::from_lights(vec![]);
        assert!(manager.is_empty());
        assert!(matches!(manager.off(), Err(BusylightError::NoLightsFound)));
    }

    #[test]
    fn keepalive_follows_selected_lights() {
        let mut manager = LightManager::from_lights(vec![
            light(Family::Luxafor, &Recorder::default()),
            light(Family::Kuando, &Recorder::default()),
        ]);
        assert_eq!(manager.keepalive_interval(), Some(Duration::from_secs(10)));

        manager.select(&[0]).unwrap();
        assert_eq!(manager.keepalive_interval(), None);
    }
}
