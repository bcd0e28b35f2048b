use js_sys::ArrayBuffer;
use nebula_core::{AudioOutput, FrequencySource, LoadError, LoadResult, Track};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// A decoded WebAudio buffer ready to play.
#[derive(Clone)]
pub struct DecodedTrack(pub web::AudioBuffer);

impl Track for DecodedTrack {
    fn duration_sec(&self) -> f64 {
        self.0.duration()
    }
}

fn create_gain(audio_ctx: &web::AudioContext, value: f32) -> anyhow::Result<web::GainNode> {
    let g = web::GainNode::new(audio_ctx).map_err(|e| anyhow::anyhow!("GainNode error: {:?}", e))?;
    g.gain().set_value(value);
    Ok(g)
}

/// Playback through `source -> gain -> destination`, with the analyser
/// tapped after the gain so the spectrum follows the volume.
pub struct WebAudioOutput {
    ctx: web::AudioContext,
    gain: web::GainNode,
    analyser: web::AnalyserNode,
    buffer: Option<web::AudioBuffer>,
    source: Option<web::AudioBufferSourceNode>,
    volume: f32,
}

impl WebAudioOutput {
    pub fn new(ctx: web::AudioContext, fft_size: u32) -> anyhow::Result<Self> {
        let gain = create_gain(&ctx, 1.0)?;
        let analyser = ctx
            .create_analyser()
            .map_err(|e| anyhow::anyhow!("AnalyserNode error: {:?}", e))?;
        analyser.set_fft_size(fft_size);
        _ = gain.connect_with_audio_node(&analyser);
        _ = gain.connect_with_audio_node(&ctx.destination());
        Ok(Self {
            ctx,
            gain,
            analyser,
            buffer: None,
            source: None,
            volume: 1.0,
        })
    }

    pub fn context(&self) -> &web::AudioContext {
        &self.ctx
    }

    pub fn analyser(&self) -> WebAnalyser {
        WebAnalyser {
            node: self.analyser.clone(),
        }
    }

    /// Browsers start contexts suspended until a user gesture.
    pub fn resume(&self) {
        if self.ctx.state() == web::AudioContextState::Suspended {
            _ = self.ctx.resume();
        }
    }
}

impl AudioOutput for WebAudioOutput {
    type Track = DecodedTrack;

    fn clock_sec(&self) -> f64 {
        self.ctx.current_time()
    }

    fn set_track(&mut self, track: DecodedTrack) {
        self.buffer = Some(track.0);
    }

    #[allow(deprecated)]
    fn start(&mut self, offset_sec: f64) {
        let Some(buffer) = &self.buffer else {
            return;
        };
        let src = match self.ctx.create_buffer_source() {
            Ok(s) => s,
            Err(e) => {
                log::error!("AudioBufferSourceNode error: {:?}", e);
                return;
            }
        };
        src.set_buffer(Some(buffer));
        src.set_loop(true);
        _ = src.connect_with_audio_node(&self.gain);
        if let Err(e) = src.start_with_when_and_grain_offset(0.0, offset_sec) {
            log::error!("source start failed: {:?}", e);
            return;
        }
        self.source = Some(src);
    }

    #[allow(deprecated)]
    fn stop(&mut self) {
        if let Some(src) = self.source.take() {
            _ = src.stop();
            _ = src.disconnect();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.gain.gain().set_value(volume);
    }

    fn volume(&self) -> f32 {
        self.volume
    }
}

/// Byte spectrum straight from the graph's `AnalyserNode`.
pub struct WebAnalyser {
    node: web::AnalyserNode,
}

impl FrequencySource for WebAnalyser {
    fn frequency_data(&mut self, out: &mut Vec<u8>) -> bool {
        let bins = self.node.frequency_bin_count() as usize;
        if bins == 0 {
            return false;
        }
        out.resize(bins, 0);
        self.node.get_byte_frequency_data(out.as_mut_slice());
        true
    }
}

async fn decode_bytes(
    ctx: &web::AudioContext,
    bytes: ArrayBuffer,
    name: &str,
) -> LoadResult<DecodedTrack> {
    let promise = ctx
        .decode_audio_data(&bytes)
        .map_err(|e| LoadError::decode(name, format!("{:?}", e)))?;
    let value = JsFuture::from(promise)
        .await
        .map_err(|e| LoadError::decode(name, format!("{:?}", e)))?;
    value
        .dyn_into::<web::AudioBuffer>()
        .map(DecodedTrack)
        .map_err(|_| LoadError::decode(name, "decoder returned no AudioBuffer"))
}

/// Fetch and decode a track bundled with the page.
pub async fn fetch_track(ctx: &web::AudioContext, url: &str) -> LoadResult<DecodedTrack> {
    let window = web::window().ok_or_else(|| LoadError::read(url, "no window"))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| LoadError::read(url, format!("{:?}", e)))?;
    let resp: web::Response = resp
        .dyn_into()
        .map_err(|_| LoadError::read(url, "fetch returned no Response"))?;
    if !resp.ok() {
        return Err(LoadError::read(url, format!("HTTP {}", resp.status())));
    }
    let body = resp
        .array_buffer()
        .map_err(|e| LoadError::read(url, format!("{:?}", e)))?;
    let bytes = JsFuture::from(body)
        .await
        .map_err(|e| LoadError::read(url, format!("{:?}", e)))?;
    let bytes: ArrayBuffer = bytes
        .dyn_into()
        .map_err(|_| LoadError::read(url, "body is not an ArrayBuffer"))?;
    decode_bytes(ctx, bytes, url).await
}

/// Read and decode a file the user picked.
pub async fn read_file(ctx: &web::AudioContext, file: &web::File) -> LoadResult<DecodedTrack> {
    let name = file.name();
    let bytes = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| LoadError::read(name.as_str(), format!("{:?}", e)))?;
    let bytes: ArrayBuffer = bytes
        .dyn_into()
        .map_err(|_| LoadError::read(name.as_str(), "file is not an ArrayBuffer"))?;
    decode_bytes(ctx, bytes, &name).await
}
