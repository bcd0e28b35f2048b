use nebula_core::{LoadError, LoadResult, Track};
use std::path::Path;
use std::sync::Arc;

/// Interleaved PCM normalised to -1..1.
#[derive(Clone, Debug)]
pub struct WavTrack {
    pub samples: Arc<[f32]>,
    pub channels: usize,
    pub sample_rate: u32,
}

impl WavTrack {
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1)
    }
}

impl Track for WavTrack {
    fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }
}

fn load_error(name: &str, err: hound::Error) -> LoadError {
    match err {
        hound::Error::IoError(e) => LoadError::read(name, e),
        other => LoadError::decode(name, other),
    }
}

pub fn decode_wav(path: &Path) -> LoadResult<WavTrack> {
    let name = path.display().to_string();
    let mut reader = hound::WavReader::open(path).map_err(|e| load_error(&name, e))?;
    let spec = reader.spec();
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| load_error(&name, e))?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .map_err(|e| load_error(&name, e))?
        }
    };

    let channels = spec.channels.max(1) as usize;
    if samples.len() < channels {
        return Err(LoadError::Empty { name });
    }
    log::debug!(
        "decoded {}: {} ch, {} Hz, {} samples",
        name,
        channels,
        spec.sample_rate,
        samples.len()
    );
    Ok(WavTrack {
        samples: samples.into(),
        channels,
        sample_rate: spec.sample_rate,
    })
}
