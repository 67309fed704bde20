use crate::constants::ANALYSER_FFT_SIZE;
use orb_core::spectrum_level;
use web_sys as web;

/// Meters a media stream through an analyser node.
pub struct LevelMeter {
    audio_ctx: web::AudioContext,
    analyser: web::AnalyserNode,
    // Kept alive for as long as the stream is metered
    _source: web::MediaStreamAudioSourceNode,
    bins: Vec<u8>,
}

impl LevelMeter {
    pub fn attach(stream: &web::MediaStream) -> anyhow::Result<Self> {
        let audio_ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        _ = audio_ctx.resume();
        let analyser =
            web::AnalyserNode::new(&audio_ctx).map_err(|e| anyhow::anyhow!("{:?}", e))?;
        analyser.set_fft_size(ANALYSER_FFT_SIZE);
        let source = audio_ctx
            .create_media_stream_source(stream)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        source
            .connect_with_audio_node(&analyser)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let bins = vec![0u8; analyser.frequency_bin_count() as usize];
        log::info!("[audio] metering stream ({} bins)", bins.len());
        Ok(Self {
            audio_ctx,
            analyser,
            _source: source,
            bins,
        })
    }

    /// Current raw level in [0, 1].
    pub fn level(&mut self) -> f32 {
        self.analyser.get_byte_frequency_data(&mut self.bins);
        spectrum_level(&self.bins)
    }

    pub fn close(&self) {
        _ = self.audio_ctx.close();
        log::info!("[audio] meter closed");
    }
}
