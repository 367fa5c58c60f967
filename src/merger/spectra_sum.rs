use crate::containers::Mergeable;
use crate::error::Result;

/// Running sum of spectra. The first spectrum added is copied and renamed,
/// later ones are added to it.
#[derive(Debug, Clone)]
pub struct SpectraSum<T> {
    name: String,
    summed: Option<T>,
}

impl<T: Mergeable + Clone> SpectraSum<T> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            summed: None,
        }
    }

    pub fn add_spectrum(&mut self, spectrum: &T) -> Result<()> {
        match self.summed.as_mut() {
            Some(sum) => sum.merge(spectrum),
            None => {
                let mut first = spectrum.clone();
                first.rename(&self.name);
                self.summed = Some(first);
                Ok(())
            }
        }
    }

    pub fn summed_spectrum(&self) -> Option<&T> {
        self.summed.as_ref()
    }

    pub fn into_summed(self) -> Option<T> {
        self.summed
    }
}
