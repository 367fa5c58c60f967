use log::info;

use crate::config::EventSelection;
use crate::containers::data_container::DataContainer;
use crate::error::Result;
use crate::histoer::Histogram;

const PT_TITLE: &str = "p_{t} (GeV/c)";

/// Ratio of the triggered over the minimum-bias raw spectrum, with binomial
/// errors. Only triggered tracks also seen by the minimum-bias trigger
/// enter the numerator.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TriggerEfficiency {
    trigger: String,
    efficiency: Histogram,
}

impl TriggerEfficiency {
    pub fn new(
        trigger: &str,
        min_bias: &mut DataContainer,
        triggered: &mut DataContainer,
        selection: &EventSelection,
    ) -> Result<Self> {
        selection.apply(min_bias);
        let denominator = min_bias.make_projection(0, "ptSpectrumminbias", PT_TITLE, "counts", false)?;

        selection.apply(triggered);
        triggered.request_seen_in_min_bias();
        let numerator = triggered.make_projection(
            0,
            &format!("ptSpectrum{trigger}"),
            PT_TITLE,
            "counts",
            false,
        )?;

        let mut efficiency = numerator.divide_binomial(&denominator, &format!("triggerEff{trigger}"))?;
        efficiency.set_axis_titles(PT_TITLE, "trigger efficiency");
        info!("Calculated trigger efficiency for {trigger}");
        Ok(Self {
            trigger: trigger.to_owned(),
            efficiency,
        })
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn efficiency_curve(&self) -> &Histogram {
        &self.efficiency
    }

    pub fn into_curve(self) -> Histogram {
        self.efficiency
    }
}
