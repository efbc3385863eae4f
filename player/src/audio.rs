use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, SampleRate, StreamConfig};
use log::{debug, error, info};
use mindful_sequencer::ToneEngine;
use shared::AudioConfig;
use std::sync::mpsc;
use std::thread;

enum ToneMessage {
    Start(f32),
    Stop,
    Shutdown,
}

/// Sine-tone playback on the system output device.
///
/// `cpal::Stream` handles are not `Send`, so the stream lives on a
/// dedicated worker thread and this handle only passes commands to it.
/// The device is probed at construction so an unavailable audio stack
/// fails fast and the caller can fall back to the silent engine.
pub struct CpalToneEngine {
    commands: mpsc::Sender<ToneMessage>,
    worker: Option<thread::JoinHandle<()>>,
}

impl CpalToneEngine {
    pub fn new(config: &AudioConfig) -> Result<Self> {
        let device = select_output_device(config)?;
        let (tx, rx) = mpsc::channel();

        let worker_config = config.clone();
        let worker = thread::spawn(move || tone_worker(device, worker_config, rx));

        Ok(Self {
            commands: tx,
            worker: Some(worker),
        })
    }

    pub fn list_output_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices: Result<Vec<String>, _> = host
            .output_devices()?
            .map(|device| device.name().map_err(|e| e.into()))
            .collect();
        devices
    }
}

impl ToneEngine for CpalToneEngine {
    fn start(&mut self, frequency_hz: f32) -> Result<()> {
        self.commands
            .send(ToneMessage::Start(frequency_hz))
            .map_err(|_| anyhow::anyhow!("Audio worker is gone"))
    }

    fn stop(&mut self) -> Result<()> {
        self.commands
            .send(ToneMessage::Stop)
            .map_err(|_| anyhow::anyhow!("Audio worker is gone"))
    }
}

impl Drop for CpalToneEngine {
    fn drop(&mut self) {
        let _ = self.commands.send(ToneMessage::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn select_output_device(config: &AudioConfig) -> Result<Device> {
    let host = cpal::default_host();

    let device = if let Some(device_name) = &config.device {
        // Try to find the specified device
        host.output_devices()?
            .find(|d| d.name().map(|n| n == *device_name).unwrap_or(false))
            .context(format!("Audio device '{}' not found", device_name))?
    } else {
        // Use default device
        host.default_output_device()
            .context("No default output device available")?
    };

    info!(
        "Using audio device: {}",
        device.name().unwrap_or_else(|_| "Unknown".to_string())
    );

    Ok(device)
}

fn tone_worker(device: Device, config: AudioConfig, commands: mpsc::Receiver<ToneMessage>) {
    let mut stream: Option<cpal::Stream> = None;

    while let Ok(message) = commands.recv() {
        match message {
            ToneMessage::Start(frequency_hz) => {
                // Drop any tone already playing so oscillators never overlap.
                stream = None;
                match build_tone_stream(&device, &config, frequency_hz) {
                    Ok(new_stream) => {
                        debug!("Tone started at {} Hz", frequency_hz);
                        stream = Some(new_stream);
                    }
                    Err(e) => {
                        error!("Failed to start tone: {}", e);
                    }
                }
            }
            ToneMessage::Stop => {
                if stream.take().is_some() {
                    debug!("Tone stopped");
                }
            }
            ToneMessage::Shutdown => break,
        }
    }
}

fn build_tone_stream(
    device: &Device,
    config: &AudioConfig,
    frequency_hz: f32,
) -> Result<cpal::Stream> {
    let supported = device
        .default_output_config()
        .context("No supported output config found")?;

    let sample_rate = if config.sample_rate == 0 {
        supported.sample_rate().0
    } else {
        config.sample_rate
    };

    let stream_config = StreamConfig {
        channels: supported.channels(),
        sample_rate: SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Fixed(config.buffer_size as u32),
    };

    info!("Audio config: {:?}", stream_config);

    match supported.sample_format() {
        SampleFormat::I8 => create_stream::<i8>(device, &stream_config, frequency_hz, config.gain),
        SampleFormat::I16 => {
            create_stream::<i16>(device, &stream_config, frequency_hz, config.gain)
        }
        SampleFormat::I32 => {
            create_stream::<i32>(device, &stream_config, frequency_hz, config.gain)
        }
        SampleFormat::I64 => {
            create_stream::<i64>(device, &stream_config, frequency_hz, config.gain)
        }
        SampleFormat::U8 => create_stream::<u8>(device, &stream_config, frequency_hz, config.gain),
        SampleFormat::U16 => {
            create_stream::<u16>(device, &stream_config, frequency_hz, config.gain)
        }
        SampleFormat::U32 => {
            create_stream::<u32>(device, &stream_config, frequency_hz, config.gain)
        }
        SampleFormat::U64 => {
            create_stream::<u64>(device, &stream_config, frequency_hz, config.gain)
        }
        SampleFormat::F32 => {
            create_stream::<f32>(device, &stream_config, frequency_hz, config.gain)
        }
        SampleFormat::F64 => {
            create_stream::<f64>(device, &stream_config, frequency_hz, config.gain)
        }
        other => Err(anyhow::anyhow!("Unsupported sample format: {:?}", other)),
    }
}

fn create_stream<T>(
    device: &Device,
    config: &StreamConfig,
    frequency_hz: f32,
    gain: f32,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32> + Send + 'static,
{
    let sample_rate = config.sample_rate.0 as f32;
    let channels = config.channels as usize;
    let mut sample_clock = 0f32;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                sample_clock = (sample_clock + 1.0) % sample_rate;
                let value = (sample_clock * frequency_hz * 2.0 * std::f32::consts::PI
                    / sample_rate)
                    .sin()
                    * gain;
                let sample = T::from_sample(value);
                for out in frame.iter_mut() {
                    *out = sample;
                }
            }
        },
        move |err| {
            error!("Audio stream error: {}", err);
        },
        None,
    )?;

    stream.play()?;

    Ok(stream)
}
