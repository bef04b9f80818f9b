use std::fs;
use std::path::Path;

const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

/// Charge of the first battery the kernel reports, `None` when there is none.
pub fn read_percent() -> Option<u8> {
    read_percent_from(Path::new(POWER_SUPPLY_DIR))
}

pub fn read_percent_from(dir: &Path) -> Option<u8> {
    let mut supplies: Vec<_> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .collect();
    supplies.sort();
    supplies.iter().find_map(|supply| {
        let kind = fs::read_to_string(supply.join("type")).ok()?;
        if kind.trim() != "Battery" {
            return None;
        }
        let capacity = fs::read_to_string(supply.join("capacity")).ok()?;
        capacity.trim().parse::<u8>().ok().filter(|percent| *percent <= 100)
    })
}
