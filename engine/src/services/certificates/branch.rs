use crate::error::RowError;
use crate::services::photos::keys;
use common::model::row::{CellValue, RawRow};
use common::model::variant::VariantKind;

pub const UNKNOWN_BRANCH_NAME: &str = "Unknown";

/// The `_size`/`_qty`/`_sqft` trio of one variant, as found on the row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantFields {
    pub size: Option<String>,
    pub qty: Option<String>,
    pub sqft: Option<String>,
}

impl VariantFields {
    fn read(raw: &RawRow, kind: VariantKind) -> Self {
        Self {
            size: raw.text(&kind.size_field()),
            qty: raw.text(&kind.qty_field()),
            sqft: raw.text(&kind.sqft_field()),
        }
    }
}

/// Typed view of one branch row.
///
/// Only the branch code is mandatory; every other field is optional and a
/// missing value is never an error.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchRow {
    /// Normalized: `101.0` arrives as `101`.
    pub branch_code: String,
    pub branch_name: Option<String>,
    pub ifsc_code: Option<String>,
    pub city_name: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub installation_date: Option<CellValue>,
    pub complete_board: VariantFields,
    pub fascia_only: VariantFields,
    pub fascia_plus_led: VariantFields,
    pub led_module_qty: Option<String>,
    pub power_supply_watt: Option<String>,
}

impl BranchRow {
    pub fn parse(raw: &RawRow) -> Result<Self, RowError> {
        Ok(Self {
            branch_code: branch_code(raw)?,
            branch_name: raw.text("branch_name"),
            ifsc_code: raw.text("ifsc_code"),
            city_name: raw.text("city_name"),
            address: raw.text("address"),
            district: raw.text("district"),
            state: raw.text("state"),
            installation_date: raw
                .get("installation_date")
                .filter(|v| !v.is_blank())
                .cloned(),
            complete_board: VariantFields::read(raw, VariantKind::CompleteBoard),
            fascia_only: VariantFields::read(raw, VariantKind::FasciaOnly),
            fascia_plus_led: VariantFields::read(raw, VariantKind::FasciaPlusLed),
            led_module_qty: raw.text("led_module_qty"),
            power_supply_watt: raw.text("power_supply_watt"),
        })
    }

    pub fn variant_fields(&self, kind: VariantKind) -> &VariantFields {
        match kind {
            VariantKind::CompleteBoard => &self.complete_board,
            VariantKind::FasciaOnly => &self.fascia_only,
            VariantKind::FasciaPlusLed => &self.fascia_plus_led,
        }
    }

    /// Name used in the output file name.
    pub fn file_name_part(&self) -> String {
        self.branch_name
            .as_deref()
            .unwrap_or(UNKNOWN_BRANCH_NAME)
            .replace('/', "-")
    }

    /// `Certificate_{code}_{name}.pdf`, with `/` in the name replaced by `-`.
    pub fn output_file_name(&self) -> String {
        format!("Certificate_{}_{}.pdf", self.branch_code, self.file_name_part())
    }
}

/// Normalized branch code of a raw row; must be non-blank and numeric.
pub fn branch_code(raw: &RawRow) -> Result<String, RowError> {
    let text = raw.text("branch_code").ok_or(RowError::MissingBranchCode)?;
    let code = keys::normalize(&text);
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(RowError::InvalidBranchCode(text));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_branch_code_is_truncated_everywhere() {
        let raw = RawRow::new()
            .with("branch_code", 101.0)
            .with("branch_name", "Jaipur Main");
        let row = BranchRow::parse(&raw).unwrap();
        assert_eq!(row.branch_code, "101");
        assert_eq!(row.output_file_name(), "Certificate_101_Jaipur Main.pdf");

        let text = RawRow::new().with("branch_code", "101.0");
        assert_eq!(BranchRow::parse(&text).unwrap().branch_code, "101");
    }

    #[test]
    fn slashes_in_names_become_hyphens() {
        let raw = RawRow::new()
            .with("branch_code", "7")
            .with("branch_name", "Ajmer/Beawar Road");
        assert_eq!(
            BranchRow::parse(&raw).unwrap().output_file_name(),
            "Certificate_7_Ajmer-Beawar Road.pdf"
        );
    }

    #[test]
    fn missing_name_falls_back_to_unknown() {
        let raw = RawRow::new().with("branch_code", "7");
        assert_eq!(
            BranchRow::parse(&raw).unwrap().output_file_name(),
            "Certificate_7_Unknown.pdf"
        );
    }

    #[test]
    fn unparsable_codes_are_row_errors() {
        assert_eq!(
            BranchRow::parse(&RawRow::new()).unwrap_err(),
            RowError::MissingBranchCode
        );
        assert_eq!(
            BranchRow::parse(&RawRow::new().with("branch_code", "  ")).unwrap_err(),
            RowError::MissingBranchCode
        );
        assert_eq!(
            BranchRow::parse(&RawRow::new().with("branch_code", "ABC-12")).unwrap_err(),
            RowError::InvalidBranchCode("ABC-12".into())
        );
    }

    #[test]
    fn optional_fields_tolerate_absence() {
        let row = BranchRow::parse(&RawRow::new().with("branch_code", "9")).unwrap();
        assert_eq!(row.ifsc_code, None);
        assert_eq!(row.installation_date, None);
        assert_eq!(row.complete_board, VariantFields::default());
    }
}
