use std::path::Path;

use image::RgbaImage;
use rand::Rng;

use crate::domain::Domain;
use crate::error::{ConfigError, Error};
use crate::population::genome::Genome;
use crate::population::organism::Organism;

/// Evolves a raw RGBA pixel buffer toward a fixed target image. Every
/// genome element is one channel byte, so the genome length is
/// `width * height * 4`.
///
/// Fitness is `pixel_distance` to the target: lower is better, 0 means
/// byte-for-byte identical. Convergence is a configured upper distance
/// bound.
#[derive(Debug)]
pub struct RasterDomain {
    target: RgbaImage,
    distance_limit: f64,
}

impl RasterDomain {
    pub fn new(target: RgbaImage, distance_limit: f64) -> Result<RasterDomain, ConfigError> {
        if target.as_raw().is_empty() {
            return Err(ConfigError::EmptyGenome);
        }
        Ok(RasterDomain {
            target,
            distance_limit,
        })
    }

    /// Load the comparison target from a PNG on disk. Missing or
    /// undecodable files surface as collaborator errors.
    pub fn from_png(path: impl AsRef<Path>, distance_limit: f64) -> Result<RasterDomain, Error> {
        let target = load_png(path.as_ref())?;
        Ok(Self::new(target, distance_limit)?)
    }

    pub fn target(&self) -> &RgbaImage {
        &self.target
    }

    pub fn width(&self) -> u32 {
        self.target.width()
    }

    pub fn height(&self) -> u32 {
        self.target.height()
    }
}

impl Domain for RasterDomain {
    type Element = u8;
    type Artifact = RgbaImage;

    fn genome_length(&self) -> usize {
        self.target.as_raw().len()
    }

    fn random_element<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        rng.gen()
    }

    fn render(&self, genome: &Genome<u8>) -> RgbaImage {
        // genome length equals the target buffer length for the whole run
        RgbaImage::from_raw(
            self.target.width(),
            self.target.height(),
            genome.elements().to_vec(),
        )
        .expect("genome length equals target buffer length")
    }

    fn fitness(&self, artifact: &RgbaImage) -> f64 {
        pixel_distance(artifact, &self.target)
    }

    fn better_than(&self, a: f64, b: f64) -> bool {
        a < b
    }

    fn is_converged(&self, best: &Organism<Self>) -> bool {
        best.fitness() <= self.distance_limit
    }
}

/// Euclidean norm of the per-channel byte differences between two buffers
/// of identical shape, truncated to a whole number. 0 means identical.
pub fn pixel_distance(a: &RgbaImage, b: &RgbaImage) -> f64 {
    let sum: u64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&x, &y)| {
            let d = i64::from(x) - i64::from(y);
            (d * d) as u64
        })
        .sum();

    (sum as f64).sqrt().trunc()
}

/// Load an RGBA image from a PNG file.
pub fn load_png(path: &Path) -> Result<RgbaImage, Error> {
    let img = image::open(path).map_err(|source| Error::TargetLoad {
        path: path.display().to_string(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Write an artifact out as a PNG. Purely observational; failures are the
/// caller's to handle.
pub fn save_png(artifact: &RgbaImage, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    artifact.save(path).map_err(|source| Error::ArtifactSave {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flat(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_raw(width, height, vec![value; (width * height * 4) as usize]).unwrap()
    }

    #[test]
    fn test_identical_buffers_score_zero() {
        // 4x4 RGBA, every channel 128
        let target = flat(4, 4, 128);
        let domain = RasterDomain::new(target.clone(), 0.0).unwrap();

        let genome = Genome::from_elements(target.as_raw().clone());
        let org = Organism::express(&domain, genome);

        assert_eq!(org.fitness(), 0.0);
        assert!(domain.is_converged(&org));
    }

    #[test]
    fn test_distance_is_truncated_euclidean_norm() {
        let a = flat(2, 2, 10);
        // two bytes off by 2 and 1: sqrt(4 + 1) = 2.23..., truncated to 2
        let mut raw = vec![10u8; 16];
        raw[0] = 12;
        raw[5] = 11;
        let b = RgbaImage::from_raw(2, 2, raw).unwrap();

        assert_eq!(pixel_distance(&a, &b), 2.0);
    }

    #[test]
    fn test_lower_is_better() {
        let domain = RasterDomain::new(flat(1, 1, 0), 0.0).unwrap();

        assert!(domain.better_than(10.0, 500.0));
        assert!(!domain.better_than(500.0, 10.0));
        assert!(!domain.better_than(10.0, 10.0));
    }

    #[test]
    fn test_genome_length_covers_every_channel() {
        let domain = RasterDomain::new(flat(3, 5, 0), 0.0).unwrap();
        assert_eq!(domain.genome_length(), 3 * 5 * 4);

        let mut rng = StdRng::seed_from_u64(2);
        let genome = Genome::random(&domain, &mut rng);
        let rendered = domain.render(&genome);

        assert_eq!(rendered.as_raw().as_slice(), genome.elements());
    }

    #[test]
    fn test_convergence_at_distance_limit() {
        let target = flat(2, 2, 100);
        let domain = RasterDomain::new(target.clone(), 50.0).unwrap();

        let close = Organism::express(&domain, Genome::from_elements(vec![110; 16]));
        let far = Organism::express(&domain, Genome::from_elements(vec![200; 16]));

        // 16 channels off by 10: sqrt(1600) = 40 <= 50
        assert_eq!(close.fitness(), 40.0);
        assert!(domain.is_converged(&close));
        assert!(!domain.is_converged(&far));
    }

    #[test]
    fn test_missing_target_file_is_a_collaborator_error() {
        let err = RasterDomain::from_png("definitely/not/here.png", 0.0).unwrap_err();
        assert!(matches!(err, Error::TargetLoad { .. }));
    }
}
