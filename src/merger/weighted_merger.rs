use std::collections::BTreeMap;

use log::{error, info};

use super::weights::WeightTable;
use crate::containers::result_data::ResultData;
use crate::error::{AnalysisError, Result};

/// Weighted sum of pt-hard bin outputs: each sample is copied, scaled by
/// cross section over trials and added to the sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedMerger;

impl WeightedMerger {
    pub fn sum_weighted_data<'a, I>(samples: I, weights: &WeightTable) -> Result<ResultData>
    where
        I: IntoIterator<Item = (i32, &'a ResultData)>,
    {
        let mut sum: Option<ResultData> = None;
        for (pt_hard_bin, data) in samples {
            let weight = weights.weight(pt_hard_bin).ok_or_else(|| {
                AnalysisError::SummingFailure(format!("no weight for pt-hard bin {pt_hard_bin}"))
            })?;
            let mut scaled = data.clone();
            scaled.scale(weight);
            info!("Adding pt-hard bin {pt_hard_bin} with weight {weight:e}");
            match sum.as_mut() {
                None => {
                    scaled.set_name("weightedSum");
                    sum = Some(scaled);
                }
                Some(total) => total.add(&scaled).map_err(|err| {
                    error!("Failed adding pt-hard bin {pt_hard_bin}: {err}");
                    AnalysisError::SummingFailure(format!("pt-hard bin {pt_hard_bin}: {err}"))
                })?,
            }
        }
        sum.ok_or_else(|| AnalysisError::SummingFailure("no pt-hard bins to sum".to_owned()))
    }
}

/// Outputs of a simulation, either one unbinned sample or a set of
/// pt-hard bins with their weights.
#[derive(Debug, Clone, Default)]
pub struct MonteCarloCollection {
    unbinned: Option<ResultData>,
    pt_hard_bins: BTreeMap<i32, ResultData>,
    weights: WeightTable,
}

impl MonteCarloCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unbinned sample.
    pub fn set_data(&mut self, results: ResultData) {
        self.unbinned = Some(results);
    }

    pub fn add_pt_hard_bin(
        &mut self,
        pt_hard_bin: i32,
        results: ResultData,
        cross_section: f64,
        trials: f64,
    ) -> Result<()> {
        self.weights.add_entry(pt_hard_bin, cross_section, trials)?;
        self.pt_hard_bins.insert(pt_hard_bin, results);
        Ok(())
    }

    pub fn get_data(&self, pt_hard_bin: Option<i32>) -> Option<&ResultData> {
        match pt_hard_bin {
            Some(bin) => self.pt_hard_bins.get(&bin),
            None => self.unbinned.as_ref(),
        }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn is_pt_hard_binned(&self) -> bool {
        !self.pt_hard_bins.is_empty()
    }

    pub fn sum_weighted_data(&self) -> Result<ResultData> {
        WeightedMerger::sum_weighted_data(
            self.pt_hard_bins.iter().map(|(bin, data)| (*bin, data)),
            &self.weights,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::result_data::tests::result_data;

    fn raw_pt(result: &mut ResultData) -> f64 {
        result
            .get_data_mut("MinBias")
            .unwrap()
            .find_track_container_mut("tracksAll")
            .unwrap()
            .make_projection(0, "pt", "", "", false)
            .unwrap()
            .bin_content(3)
    }

    #[test]
    fn test_weighted_sum() {
        let mut collection = MonteCarloCollection::new();
        collection
            .add_pt_hard_bin(1, result_data("bin1", &["MinBias"], 10), 10.0, 100.0)
            .unwrap();
        collection
            .add_pt_hard_bin(2, result_data("bin2", &["MinBias"], 10), 2.0, 1.0)
            .unwrap();
        let mut sum = collection.sum_weighted_data().unwrap();
        assert!((raw_pt(&mut sum) - 21.0).abs() < 1e-9);
        // inputs stay untouched
        let mut first = collection.get_data(Some(1)).unwrap().clone();
        assert!((raw_pt(&mut first) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_two_bin_weighted_sum() {
        let mut weights = WeightTable::new();
        weights.add_entry(1, 1.0, 2.0).unwrap();
        weights.add_entry(2, 2.0, 1.0).unwrap();
        let a = result_data("a", &["MinBias"], 10);
        let b = result_data("b", &["MinBias"], 10);
        let mut sum = WeightedMerger::sum_weighted_data([(1, &a), (2, &b)], &weights).unwrap();
        assert!((raw_pt(&mut sum) - 25.0).abs() < 1e-9);
        assert_eq!(sum.name(), "weightedSum");
    }

    #[test]
    fn test_summing_failures() {
        let weights = WeightTable::new();
        let a = result_data("a", &["MinBias"], 1);
        assert!(matches!(
            WeightedMerger::sum_weighted_data([(1, &a)], &weights),
            Err(AnalysisError::SummingFailure(_))
        ));
        assert!(matches!(
            WeightedMerger::sum_weighted_data(std::iter::empty::<(i32, &ResultData)>(), &weights),
            Err(AnalysisError::SummingFailure(_))
        ));

        let mut weights = WeightTable::new();
        weights.add_entry(1, 1.0, 1.0).unwrap();
        weights.add_entry(2, 1.0, 1.0).unwrap();
        let b = result_data("b", &["EMCJHigh"], 1);
        assert!(matches!(
            WeightedMerger::sum_weighted_data([(1, &a), (2, &b)], &weights),
            Err(AnalysisError::SummingFailure(_))
        ));
    }
}
