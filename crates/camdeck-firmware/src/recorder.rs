//! Push-to-talk recording from an I2S MEMS microphone into memory.

use esp_idf_svc::hal::delay::NON_BLOCK;
use esp_idf_svc::hal::gpio::{AnyIOPin, InputPin, OutputPin};
use esp_idf_svc::hal::i2s::config::{
    Config, DataBitWidth, SlotMode, StdClkConfig, StdConfig, StdGpioConfig, StdSlotConfig,
};
use esp_idf_svc::hal::i2s::{I2s, I2sDriver, I2sRx};
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::sys::{self, EspError};

use camdeck_ui::{Recorder, RecorderError, Recording};

use crate::config::mic;

const BYTES_PER_SAMPLE: usize = 2;
const WAV_HEADER_LEN: usize = 44;
const READ_CHUNK: usize = 1024;

pub struct MicRecorder {
    driver: I2sDriver<'static, I2sRx>,
    pcm: Vec<u8>,
    recording: bool,
}

impl MicRecorder {
    pub fn new<I: I2s>(
        i2s: impl Peripheral<P = I> + 'static,
        sck: impl Peripheral<P = impl InputPin + OutputPin> + 'static,
        sd: impl Peripheral<P = impl InputPin> + 'static,
        ws: impl Peripheral<P = impl InputPin + OutputPin> + 'static,
    ) -> Result<Self, EspError> {
        let config = StdConfig::new(
            Config::default(),
            StdClkConfig::from_sample_rate_hz(mic::SAMPLE_RATE),
            StdSlotConfig::philips_slot_default(DataBitWidth::Bits16, SlotMode::Mono),
            StdGpioConfig::default(),
        );
        let driver = I2sDriver::new_std_rx(i2s, &config, sck, sd, Option::<AnyIOPin>::None, ws)?;
        log::info!("Microphone ready: {} Hz, 16-bit mono", mic::SAMPLE_RATE);
        Ok(Self {
            driver,
            pcm: Vec::new(),
            recording: false,
        })
    }

    fn max_bytes() -> usize {
        (mic::SAMPLE_RATE * mic::MAX_SECONDS) as usize * BYTES_PER_SAMPLE
    }

    /// Moves whatever the DMA buffers hold into `pcm` without blocking.
    fn drain(&mut self) -> Result<(), RecorderError> {
        let mut chunk = [0u8; READ_CHUNK];
        while self.pcm.len() < Self::max_bytes() {
            let read = match self.driver.read(&mut chunk, NON_BLOCK) {
                Ok(read) => read,
                Err(err) if err.code() == sys::ESP_ERR_TIMEOUT as sys::esp_err_t => 0,
                Err(err) => return Err(RecorderError::Io(err.to_string())),
            };
            if read == 0 {
                break;
            }
            let room = Self::max_bytes() - self.pcm.len();
            self.pcm.extend_from_slice(&chunk[..read.min(room)]);
        }
        Ok(())
    }

    fn halt(&mut self) {
        self.recording = false;
        if let Err(err) = self.driver.rx_disable() {
            log::warn!("I2S rx_disable failed: {}", err);
        }
    }
}

impl Recorder for MicRecorder {
    fn start(&mut self) -> Result<(), RecorderError> {
        self.pcm.clear();
        self.pcm.reserve(Self::max_bytes() / 4);
        self.driver
            .rx_enable()
            .map_err(|err| RecorderError::Io(err.to_string()))?;
        self.recording = true;
        Ok(())
    }

    fn poll(&mut self) -> Result<(), RecorderError> {
        if !self.recording {
            return Err(RecorderError::NotRecording);
        }
        self.drain()
    }

    fn stop(&mut self) -> Result<Recording, RecorderError> {
        if !self.recording {
            return Err(RecorderError::NotRecording);
        }
        let drained = self.drain();
        self.halt();
        drained?;

        let pcm = core::mem::take(&mut self.pcm);
        let samples = pcm.len() / BYTES_PER_SAMPLE;
        let duration_secs = samples as f32 / mic::SAMPLE_RATE as f32;

        let mut audio = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());
        audio.extend_from_slice(&wav_header(pcm.len() as u32, mic::SAMPLE_RATE));
        audio.extend_from_slice(&pcm);
        log::info!("Recorded {:.1}s ({} bytes WAV)", duration_secs, audio.len());
        Ok(Recording {
            audio,
            duration_secs,
        })
    }

    fn cancel(&mut self) {
        if self.recording {
            self.halt();
        }
        self.pcm = Vec::new();
    }

    fn is_recording(&self) -> bool {
        self.recording
    }
}

/// Canonical 44-byte RIFF/WAVE header for 16-bit mono PCM.
fn wav_header(data_len: u32, sample_rate: u32) -> [u8; WAV_HEADER_LEN] {
    let byte_rate = sample_rate * BYTES_PER_SAMPLE as u32;
    let mut header = [0u8; WAV_HEADER_LEN];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&(36 + data_len).to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    header[22..24].copy_from_slice(&1u16.to_le_bytes()); // mono
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&(BYTES_PER_SAMPLE as u16).to_le_bytes());
    header[34..36].copy_from_slice(&16u16.to_le_bytes());
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_len.to_le_bytes());
    header
}
