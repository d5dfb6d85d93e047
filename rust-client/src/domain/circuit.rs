use serde::Serialize;

/// Metadata row for one monitored circuit, as stored in the `circuits`
/// table. Ids double as column names in the energy fact tables.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CircuitRow {
    pub circuit_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Every column of the energy fact tables that can be charted on its own.
///
/// The original schema couples circuit ids to fact-table column names;
/// this enum makes that mapping explicit so per-circuit SQL only ever
/// interpolates a vetted constant, never caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Circuit {
    AdjustedLoad,
    Solar,
    Used,
    WaterHeater,
    Ashp,
    WaterPump,
    Dryer,
    Washer,
    Dishwasher,
    Stove,
    Refrigerator,
    LivingRoom,
    AuxHeatBedrooms,
    AuxHeatLiving,
    Study,
    Barn,
    BasementWest,
    BasementEast,
    Ventilation,
    VentilationPreheat,
    KitchenReceptRt,
}

impl Circuit {
    /// The individually monitored circuits, in breakdown display order.
    /// Excludes the `used`/`solar`/`adjusted_load` aggregate columns.
    pub const MONITORED: [Circuit; 18] = [
        Circuit::WaterHeater,
        Circuit::Ashp,
        Circuit::WaterPump,
        Circuit::Dryer,
        Circuit::Washer,
        Circuit::Dishwasher,
        Circuit::Stove,
        Circuit::Refrigerator,
        Circuit::LivingRoom,
        Circuit::AuxHeatBedrooms,
        Circuit::AuxHeatLiving,
        Circuit::Study,
        Circuit::Barn,
        Circuit::BasementWest,
        Circuit::BasementEast,
        Circuit::Ventilation,
        Circuit::VentilationPreheat,
        Circuit::KitchenReceptRt,
    ];

    /// Fact-table column name. Identical to the public circuit id.
    pub fn column(self) -> &'static str {
        match self {
            Circuit::AdjustedLoad => "adjusted_load",
            Circuit::Solar => "solar",
            Circuit::Used => "used",
            Circuit::WaterHeater => "water_heater",
            Circuit::Ashp => "ashp",
            Circuit::WaterPump => "water_pump",
            Circuit::Dryer => "dryer",
            Circuit::Washer => "washer",
            Circuit::Dishwasher => "dishwasher",
            Circuit::Stove => "stove",
            Circuit::Refrigerator => "refrigerator",
            Circuit::LivingRoom => "living_room",
            Circuit::AuxHeatBedrooms => "aux_heat_bedrooms",
            Circuit::AuxHeatLiving => "aux_heat_living",
            Circuit::Study => "study",
            Circuit::Barn => "barn",
            Circuit::BasementWest => "basement_west",
            Circuit::BasementEast => "basement_east",
            Circuit::Ventilation => "ventilation",
            Circuit::VentilationPreheat => "ventilation_preheat",
            Circuit::KitchenReceptRt => "kitchen_recept_rt",
        }
    }

    pub fn id(self) -> &'static str {
        self.column()
    }

    pub fn parse(raw: &str) -> Option<Circuit> {
        let all = [
            Circuit::AdjustedLoad,
            Circuit::Solar,
            Circuit::Used,
            Circuit::WaterHeater,
            Circuit::Ashp,
            Circuit::WaterPump,
            Circuit::Dryer,
            Circuit::Washer,
            Circuit::Dishwasher,
            Circuit::Stove,
            Circuit::Refrigerator,
            Circuit::LivingRoom,
            Circuit::AuxHeatBedrooms,
            Circuit::AuxHeatLiving,
            Circuit::Study,
            Circuit::Barn,
            Circuit::BasementWest,
            Circuit::BasementEast,
            Circuit::Ventilation,
            Circuit::VentilationPreheat,
            Circuit::KitchenReceptRt,
        ];
        all.into_iter().find(|c| c.id() == raw)
    }
}

/// What the `circuit` query parameter selects in the usage view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitSelector {
    /// Breakdown of every monitored circuit over the range.
    Summary,
    /// All monitored circuits combined (the `used` total, with budget).
    All,
    /// Usage not attributed to any monitored circuit.
    AllOther,
    /// The air-source heat pump, reported alongside on-the-fly HDD.
    Ashp,
    /// A single fact-table column.
    Column(Circuit),
}

impl CircuitSelector {
    pub fn parse(raw: &str) -> Option<CircuitSelector> {
        match raw {
            "summary" => Some(CircuitSelector::Summary),
            "all" => Some(CircuitSelector::All),
            "all_other" => Some(CircuitSelector::AllOther),
            "ashp" => Some(CircuitSelector::Ashp),
            other => Circuit::parse(other).map(CircuitSelector::Column),
        }
    }

    /// The id echoed back in responses (`view: "usage.<id>"`).
    pub fn id(self) -> &'static str {
        match self {
            CircuitSelector::Summary => "summary",
            CircuitSelector::All => "all",
            CircuitSelector::AllOther => "all_other",
            CircuitSelector::Ashp => "ashp",
            CircuitSelector::Column(c) => c.id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monitored_circuits_are_distinct_columns() {
        let mut cols: Vec<&str> = Circuit::MONITORED.iter().map(|c| c.column()).collect();
        cols.sort();
        cols.dedup();
        assert_eq!(cols.len(), 18);
    }

    #[test]
    fn selector_parses_aliases_and_columns() {
        assert_eq!(CircuitSelector::parse("summary"), Some(CircuitSelector::Summary));
        assert_eq!(CircuitSelector::parse("all"), Some(CircuitSelector::All));
        assert_eq!(CircuitSelector::parse("all_other"), Some(CircuitSelector::AllOther));
        assert_eq!(CircuitSelector::parse("ashp"), Some(CircuitSelector::Ashp));
        assert_eq!(
            CircuitSelector::parse("water_heater"),
            Some(CircuitSelector::Column(Circuit::WaterHeater))
        );
        assert_eq!(CircuitSelector::parse("garage"), None);
    }

    #[test]
    fn aggregate_columns_are_selectable_but_not_monitored() {
        assert_eq!(Circuit::parse("used"), Some(Circuit::Used));
        assert!(!Circuit::MONITORED.contains(&Circuit::Used));
        assert!(!Circuit::MONITORED.contains(&Circuit::AdjustedLoad));
    }
}
