/*!
Reading and writing sequences as CSV
*/
use crate::{CpuFloat, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// One sample of a sequence, as stored on disk
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample<F = CpuFloat> {
    /// The sample's index in the sequence
    pub t: usize,
    /// The sample's value
    pub value: F,
}

/// Write a sequence to a Writer as `t,value` records.
/// On success, return how many samples were written
pub fn write_sequence<W, I>(wtr: W, samples: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = CpuFloat>,
{
    let mut wtr = csv::Writer::from_writer(wtr);
    let mut written = 0;
    for (t, value) in samples.into_iter().enumerate() {
        wtr.serialize(Sample { t, value })?;
        written += 1;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(written)
}

/// Deserialize samples from a Reader
pub fn deserialize_samples<R: Read>(rdr: R) -> impl Iterator<Item = std::result::Result<Sample, csv::Error>> {
    csv::Reader::from_reader(rdr).into_deserialize()
}

/// Read a sequence written by `write_sequence`, in file order
pub fn read_sequence<R: Read>(rdr: R) -> Result<Vec<CpuFloat>> {
    let mut sequence = Vec::new();
    for sample in deserialize_samples(rdr) {
        sequence.push(sample?.value);
    }
    Ok(sequence)
}
