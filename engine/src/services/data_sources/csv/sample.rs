use crate::error::EngineError;
use std::path::Path;

/// Column set of the data template, in the order operators see it.
pub const SAMPLE_HEADERS: [&str; 23] = [
    "branch_code",
    "ifsc_code",
    "installation_date",
    "type_of_office",
    "branch_name",
    "branch_person_name",
    "contact_number",
    "city_name",
    "address",
    "district",
    "state",
    "rbd",
    "complete_board_size",
    "complete_board_qty",
    "complete_board_sqft",
    "only_fascia_replacement_size",
    "only_fascia_replacement_qty",
    "only_fascia_replacement_sqft",
    "fascia_+_led_replacement_size",
    "fascia_+_led_replacement_qty",
    "fascia_+_led_replacement_sqft",
    "led_module_qty",
    "power_supply_watt",
];

/// Two example branches: one complete board, one fascia-only replacement.
pub const SAMPLE_ROWS: [[&str; 23]; 2] = [
    [
        "101",
        "RBGB0000101",
        "2025-01-01",
        "Branch Office",
        "Jaipur Main",
        "Rajesh Kumar",
        "9876543210",
        "Jaipur",
        "MG Road, Near City Center",
        "Jaipur",
        "Rajasthan",
        "Jaipur Zone",
        "8x4",
        "1",
        "32",
        "",
        "0",
        "0",
        "",
        "0",
        "0",
        "0",
        "0",
    ],
    [
        "102",
        "RBGB0000102",
        "2025-01-05",
        "Sub-Office",
        "Udaipur City",
        "Amit Singh",
        "9876543211",
        "Udaipur",
        "Lake View Road",
        "Udaipur",
        "Rajasthan",
        "Udaipur Zone",
        "",
        "0",
        "0",
        "10x5",
        "1",
        "50",
        "",
        "0",
        "0",
        "0",
        "0",
    ],
];

/// Writes the data template with two example rows.
pub fn write_sample_csv(path: &Path) -> Result<(), EngineError> {
    let mut writer = ::csv::Writer::from_path(path)?;
    writer.write_record(SAMPLE_HEADERS)?;
    for row in SAMPLE_ROWS {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
