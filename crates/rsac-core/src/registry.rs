//! Static dataset registry: logical dataset keys, physical table names and
//! per-dataset capability flags.
//!
//! Every identifier that ever reaches SQL text comes from this module; request
//! input is only ever bound as a query parameter. The census tables are
//! heterogeneous historical snapshots, so which optional columns exist is
//! recorded here per dataset instead of being re-derived per endpoint.

/// Optional-column flags for one census dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub district: bool,
    pub site: bool,
    pub range_forest: bool,
    pub colony: bool,
    pub adults: bool,
    pub juvenile: bool,
    pub nests: bool,
    pub threats: bool,
}

impl Capabilities {
    /// True when at least one population column (adults/juvenile/nests) exists.
    pub fn has_population(&self) -> bool {
        self.adults || self.juvenile || self.nests
    }
}

/// One logical dataset: user-facing key, physical table, capabilities.
#[derive(Debug, Clone, Copy)]
pub struct DatasetDescriptor {
    pub key: &'static str,
    pub physical_table: &'static str,
    pub capabilities: Capabilities,
}

/// The sarus crane census datasets.
///
/// `sarus_27_09_2021` has no adults column and `sarus_lucknow_population`
/// is a colony survey without district or site columns.
static DATASETS: &[DatasetDescriptor] = &[
    DatasetDescriptor {
        key: "sarus_2_09_2020",
        physical_table: "uprsac_09xxxx_saruscount_02092020",
        capabilities: Capabilities {
            district: true,
            site: true,
            range_forest: false,
            colony: false,
            adults: true,
            juvenile: true,
            nests: true,
            threats: true,
        },
    },
    DatasetDescriptor {
        key: "sarus_21_01_2021",
        physical_table: "uprsac_09xxxx_saruscount_21012021",
        capabilities: Capabilities {
            district: true,
            site: true,
            range_forest: false,
            colony: false,
            adults: true,
            juvenile: true,
            nests: true,
            threats: true,
        },
    },
    DatasetDescriptor {
        key: "sarus_27_09_2021",
        physical_table: "uprsac_09xxxx_saruscount_27092021",
        capabilities: Capabilities {
            district: true,
            site: true,
            range_forest: false,
            colony: false,
            adults: false,
            juvenile: true,
            nests: true,
            threats: true,
        },
    },
    DatasetDescriptor {
        key: "sarus_lucknow_population",
        physical_table: "uprsac_09xxxx_saruslkpop_xxxx2021",
        capabilities: Capabilities {
            district: false,
            site: false,
            range_forest: true,
            colony: true,
            adults: true,
            juvenile: true,
            nests: true,
            threats: false,
        },
    },
];

/// Resolve a logical dataset key. Unknown keys return `None`; callers turn
/// that into a client error before touching the database.
pub fn dataset(key: &str) -> Option<&'static DatasetDescriptor> {
    DATASETS.iter().find(|d| d.key == key)
}

/// All registered datasets.
pub fn datasets() -> &'static [DatasetDescriptor] {
    DATASETS
}

/// Physical tables behind the transport dashboard. The dashboard battery is
/// fixed, so these are plain constants rather than registry entries.
pub mod transport {
    pub const RAILWAY_2010: &str = "uprsac_09xxxx_railwaynet_xxxx2018";
    pub const NATIONAL_HIGHWAY_2010: &str = "uprsac_09xxxx_nationalhw_xxxx2018";
    pub const STATE_HIGHWAY_2010: &str = "uprsac_09xxxx_statehighw_xxxx2018";
    pub const OTHER_ROADS_2010: &str = "uprsac_09xxxx_rdnonhshex_xxxx2018";

    pub const RAILWAY_2018: &str = "uprsac_09xxxx_uprailways_06072023";
    pub const NATIONAL_HIGHWAY_2018: &str = "national_highway_2018";
    pub const STATE_HIGHWAY_2018: &str = "state_highway_2018";
    pub const OTHER_ROADS_2018: &str = "other_roads_2018";

    pub const GANGA_CRUISE: &str = "uprsac_09xxxx_gangacruse_06022023";

    pub const EXPRESSWAYS_EXISTING: &str = "upeida_09xxxx_existngexp_23082023";
    pub const EXPRESSWAYS_UPCOMING: &str = "upeida_09xxxx_upcmingexp_23082023";

    pub const ROADWAYS_ROUTES: &str = "uprsac_09xxxx_uproadways_04102023";
    pub const RTA_ROUTES: &str = "transd_09xxxx_roadwayrta_27092023";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_resolve() {
        for d in datasets() {
            let resolved = dataset(d.key).expect("registered key must resolve");
            assert!(!resolved.physical_table.is_empty());
        }
    }

    #[test]
    fn test_unknown_key_is_none() {
        assert!(dataset("not_a_real_table").is_none());
        assert!(dataset("").is_none());
    }

    #[test]
    fn test_lucknow_has_no_district() {
        let d = dataset("sarus_lucknow_population").unwrap();
        assert!(!d.capabilities.district);
        assert!(!d.capabilities.site);
        assert!(d.capabilities.colony);
        assert!(d.capabilities.range_forest);
    }

    #[test]
    fn test_2021_autumn_census_lacks_adults() {
        let d = dataset("sarus_27_09_2021").unwrap();
        assert!(!d.capabilities.adults);
        assert!(d.capabilities.juvenile);
    }
}
