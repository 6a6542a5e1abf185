use crate::services::certificates::branch::BranchRow;
use common::model::variant::{Variant, VariantKind};

const DEFAULT_QTY: &str = "1";
const DEFAULT_SQFT: &str = "0";

/// Coverage variants present on a row, always in `VariantKind::ALL` order.
///
/// A variant is present iff its `_size` field is non-blank. Quantity defaults
/// to `1` and area to `0` when their fields are blank.
pub fn detect_variants(row: &BranchRow) -> Vec<Variant> {
    VariantKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let fields = row.variant_fields(kind);
            let size = fields.size.clone()?;
            Some(Variant {
                kind,
                size,
                qty: fields.qty.clone().unwrap_or_else(|| DEFAULT_QTY.to_string()),
                sqft: fields.sqft.clone().unwrap_or_else(|| DEFAULT_SQFT.to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::row::RawRow;

    fn parse(raw: RawRow) -> BranchRow {
        BranchRow::parse(&raw.with("branch_code", "101")).unwrap()
    }

    #[test]
    fn no_sizes_means_no_variants() {
        let row = parse(
            RawRow::new()
                .with("complete_board_qty", "2")
                .with("led_module_qty", "12"),
        );
        assert!(detect_variants(&row).is_empty());
    }

    #[test]
    fn order_is_fixed_regardless_of_field_order() {
        let row = parse(
            RawRow::new()
                .with("fascia_+_led_replacement_size", "6x3")
                .with("only_fascia_replacement_size", "10x5")
                .with("complete_board_size", "8x4"),
        );
        let kinds: Vec<VariantKind> = detect_variants(&row).iter().map(|v| v.kind).collect();
        assert_eq!(kinds, VariantKind::ALL.to_vec());
    }

    #[test]
    fn blank_qty_and_sqft_take_defaults() {
        let row = parse(
            RawRow::new()
                .with("only_fascia_replacement_size", "10x5")
                .with("only_fascia_replacement_qty", "")
                .with("only_fascia_replacement_sqft", "  "),
        );
        let variants = detect_variants(&row);
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].kind, VariantKind::FasciaOnly);
        assert_eq!(variants[0].qty, "1");
        assert_eq!(variants[0].sqft, "0");
    }

    #[test]
    fn supplied_values_are_kept_as_given() {
        let row = parse(
            RawRow::new()
                .with("complete_board_size", "8x4")
                .with("complete_board_qty", 2.0)
                .with("complete_board_sqft", 32.5),
        );
        let v = &detect_variants(&row)[0];
        assert_eq!((v.size.as_str(), v.qty.as_str(), v.sqft.as_str()), ("8x4", "2", "32.5"));
        assert_eq!(v.photo_caption(), "8x4 (Complete Board)");
    }

    #[test]
    fn any_subset_may_be_present() {
        let row = parse(
            RawRow::new()
                .with("complete_board_size", "8x4")
                .with("fascia_+_led_replacement_size", "6x3"),
        );
        let kinds: Vec<VariantKind> = detect_variants(&row).iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![VariantKind::CompleteBoard, VariantKind::FasciaPlusLed]);
    }
}
