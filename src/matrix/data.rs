//! Sample data bundle: the five input matrices both formulas read
//!
//! The bundle is created once per run, either generated from a seeded RNG or
//! loaded from a JSON document of the form
//! `{"B": [[..]], "E": [[..]], "ME": [[..]], "MZ": [[..]], "MM": [[..]]}`.

use super::Matrix;
use crate::error::{Error, Result};
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Default side length used by the data generator
pub const DEFAULT_SIZE: usize = 100;
/// Default inclusive lower bound of generated values
pub const DEFAULT_LOW: f64 = 1.0;
/// Default exclusive upper bound of generated values
pub const DEFAULT_HIGH: f64 = 100.0;

/// Immutable bundle of the matrices `B`, `E`, `ME`, `MZ`, `MM`.
///
/// All five are square and share one shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSampleData")]
pub struct SampleData {
    #[serde(rename = "B")]
    b: Matrix,
    #[serde(rename = "E")]
    e: Matrix,
    #[serde(rename = "ME")]
    me: Matrix,
    #[serde(rename = "MZ")]
    mz: Matrix,
    #[serde(rename = "MM")]
    mm: Matrix,
}

#[derive(Deserialize)]
struct RawSampleData {
    #[serde(rename = "B")]
    b: Matrix,
    #[serde(rename = "E")]
    e: Matrix,
    #[serde(rename = "ME")]
    me: Matrix,
    #[serde(rename = "MZ")]
    mz: Matrix,
    #[serde(rename = "MM")]
    mm: Matrix,
}

fn random_matrix<R: Rng + ?Sized>(size: usize, dist: &Uniform<f64>, rng: &mut R) -> Result<Matrix> {
    let data = (0..size * size).map(|_| dist.sample(&mut *rng)).collect();
    Matrix::new(size, size, data)
}

impl TryFrom<RawSampleData> for SampleData {
    type Error = Error;

    fn try_from(raw: RawSampleData) -> Result<Self> {
        Self::new(raw.b, raw.e, raw.me, raw.mz, raw.mm)
    }
}

impl SampleData {
    /// Bundle five matrices, checking they are square and equally sized.
    pub fn new(b: Matrix, e: Matrix, me: Matrix, mz: Matrix, mm: Matrix) -> Result<Self> {
        if !b.is_square() {
            return Err(Error::shape_mismatch(
                "sample_data",
                &b.shape(),
                &[b.rows(), b.rows()],
            ));
        }
        for other in [&e, &me, &mz, &mm] {
            if other.shape() != b.shape() {
                return Err(Error::shape_mismatch(
                    "sample_data",
                    &b.shape(),
                    &other.shape(),
                ));
            }
        }
        Ok(Self { b, e, me, mz, mm })
    }

    /// Generate five `size × size` matrices with values drawn uniformly from
    /// `[low, high)`.
    pub fn generate<R: Rng + ?Sized>(size: usize, low: f64, high: f64, rng: &mut R) -> Result<Self> {
        if size == 0 {
            return Err(Error::invalid_argument("size", "must be positive"));
        }
        let dist = Uniform::new(low, high).map_err(|e| {
            Error::invalid_argument("bounds", format!("[{low}, {high}): {e}"))
        })?;

        let b = random_matrix(size, &dist, rng)?;
        let e = random_matrix(size, &dist, rng)?;
        let me = random_matrix(size, &dist, rng)?;
        let mz = random_matrix(size, &dist, rng)?;
        let mm = random_matrix(size, &dist, rng)?;
        Self::new(b, e, me, mz, mm)
    }

    /// Generate reproducible data from a seed.
    pub fn generate_seeded(size: usize, low: f64, high: f64, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(size, low, high, &mut rng)
    }

    /// Read a bundle from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let data = serde_json::from_reader(reader)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded sample data");
        Ok(data)
    }

    /// Write the bundle to a JSON file, replacing any existing file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Side length of every matrix in the bundle
    pub fn size(&self) -> usize {
        self.b.rows()
    }

    /// Matrix `B`
    pub fn b(&self) -> &Matrix {
        &self.b
    }

    /// Matrix `E`
    pub fn e(&self) -> &Matrix {
        &self.e
    }

    /// Matrix `ME`
    pub fn me(&self) -> &Matrix {
        &self.me
    }

    /// Matrix `MZ`
    pub fn mz(&self) -> &Matrix {
        &self.mz
    }

    /// Matrix `MM`
    pub fn mm(&self) -> &Matrix {
        &self.mm
    }
}
