use anyhow::{Context, Result};

use math::{vec3, Quat, Vec3};
use scene::{Camera, InstanceBuffer, Upload};

mod chaos;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const DEFAULT_INSTANCES: usize = 15000;
const DEFAULT_SEED: u64 = 0x5eed;

fn parse_seed(s: &str) -> Result<u64> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.with_context(|| format!("invalid seed {:?}", s))
}

/// Indices of the first and last instance, each listed once.
fn first_and_last(len: usize) -> Vec<usize> {
    match len {
        0 => Vec::new(),
        1 => vec![0],
        n => vec![0, n - 1],
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let instances = match std::env::args().nth(1) {
        Some(s) => s.parse::<usize>().with_context(|| format!("invalid instance count {:?}", s))?,
        None => DEFAULT_INSTANCES,
    };
    let seed = match std::env::args().nth(2) {
        Some(s) => parse_seed(&s)?,
        None => DEFAULT_SEED,
    };
    log::info!("generating {} instances with seed {:#x}", instances, seed);

    let mut rng = fastrand::Rng::with_seed(seed);
    let corners = chaos::triangle(WIDTH, HEIGHT);
    let points = chaos::points(&mut rng, &corners, instances);

    let scale = vec3(2.0, 2.0, 1.0);
    let rot = Quat::identity();
    let mut buffer = InstanceBuffer::with_capacity(points.len());
    for p in points.iter() {
        buffer.push(p.extend(0.0), scale, rot);
    }

    let camera = Camera::canvas(WIDTH, HEIGHT);
    let mut uniforms = Vec::new();
    camera.view().upload(&mut uniforms);
    camera.projection_matrix().upload(&mut uniforms);

    log::info!(
        "instance buffer: {} instances, {} bytes; uniforms: {} bytes",
        buffer.len(),
        buffer.as_bytes().len(),
        uniforms.len() * core::mem::size_of::<f32>()
    );

    let view_projection = camera.view_projection();
    for index in first_and_last(buffer.len()) {
        let model = buffer.matrix(index)?;
        let mut clip = Vec3::ZERO;
        clip.transform_mat4(&(view_projection * model));
        log::info!("instance {} at {} in clip space", index, clip);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_parse_as_decimal_or_hex() {
        assert_eq!(parse_seed("42").unwrap(), 42);
        assert_eq!(parse_seed("0x5eed").unwrap(), 0x5eed);
        assert!(parse_seed("seed").is_err());
    }

    #[test]
    fn single_instance_is_reported_once() {
        assert!(first_and_last(0).is_empty());
        assert_eq!(first_and_last(1), [0]);
        assert_eq!(first_and_last(15000), [0, 14999]);
    }
}
