use serde::{Deserialize, Serialize};

/// The three warranty coverage kinds a branch can qualify for.
///
/// Declaration order is the priority order used for detection, table layout
/// and photo lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VariantKind {
    CompleteBoard,
    FasciaOnly,
    FasciaPlusLed,
}

/// How the LED module and power supply columns are shown for a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessoryPolicy {
    /// Both columns merged into a single "Comprehensive Warranty" cell.
    Comprehensive,
    /// Both columns left empty.
    Blank,
    /// The row's `led_module_qty` and `power_supply_watt`.
    RowValues,
}

impl VariantKind {
    pub const ALL: [VariantKind; 3] = [
        VariantKind::CompleteBoard,
        VariantKind::FasciaOnly,
        VariantKind::FasciaPlusLed,
    ];

    /// Numeral used in photo keys (`{branch}_{type_id}`).
    pub fn type_id(self) -> u8 {
        match self {
            VariantKind::CompleteBoard => 1,
            VariantKind::FasciaOnly => 2,
            VariantKind::FasciaPlusLed => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            VariantKind::CompleteBoard => "Complete Board",
            VariantKind::FasciaOnly => "Only Fascia Replacement",
            VariantKind::FasciaPlusLed => "Fascia + LED Replacement",
        }
    }

    /// Short label shown in the pre-flight report.
    pub fn label(self) -> &'static str {
        match self {
            VariantKind::CompleteBoard => "1 (Complete)",
            VariantKind::FasciaOnly => "2 (Fascia)",
            VariantKind::FasciaPlusLed => "3 (Fascia+LED)",
        }
    }

    /// Column prefix of the `_size`/`_qty`/`_sqft` trio in the data source.
    pub fn field_prefix(self) -> &'static str {
        match self {
            VariantKind::CompleteBoard => "complete_board",
            VariantKind::FasciaOnly => "only_fascia_replacement",
            VariantKind::FasciaPlusLed => "fascia_+_led_replacement",
        }
    }

    pub fn size_field(self) -> String {
        format!("{}_size", self.field_prefix())
    }

    pub fn qty_field(self) -> String {
        format!("{}_qty", self.field_prefix())
    }

    pub fn sqft_field(self) -> String {
        format!("{}_sqft", self.field_prefix())
    }

    pub fn accessory_policy(self) -> AccessoryPolicy {
        match self {
            VariantKind::CompleteBoard => AccessoryPolicy::Comprehensive,
            VariantKind::FasciaOnly => AccessoryPolicy::Blank,
            VariantKind::FasciaPlusLed => AccessoryPolicy::RowValues,
        }
    }
}

/// One detected coverage variant on a row, with the values as supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub kind: VariantKind,
    pub size: String,
    pub qty: String,
    pub sqft: String,
}

impl Variant {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    /// Caption printed above the variant's photo: `"{size} ({title})"`.
    pub fn photo_caption(&self) -> String {
        format!("{} ({})", self.size, self.title())
    }
}
