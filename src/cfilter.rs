use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Error};
use clap::{arg, crate_version, Command};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use complementary_filter::{FilterConfig, Highpass, Lowpass};

type Samples = Box<dyn Iterator<Item = Result<f64, Error>>>;

trait SampleWriter {
    fn write_sample(&mut self, value: f64, derivative: Option<f64>) -> Result<(), Error>;
    fn finalize(&mut self) -> Result<(), Error>;
}

struct TextSampleWriter<W: Write> {
    writer: W,
}

struct WavSampleWriter<W: Write + Seek> {
    writer: Option<WavWriter<W>>,
}

impl<W: Write> SampleWriter for TextSampleWriter<W> {
    fn write_sample(&mut self, value: f64, derivative: Option<f64>) -> Result<(), Error> {
        match derivative {
            Some(d) => writeln!(self.writer, "{},{}", value, d)?,
            None => writeln!(self.writer, "{}", value)?,
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), Error> {
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Seek> SampleWriter for WavSampleWriter<W> {
    fn write_sample(&mut self, value: f64, _derivative: Option<f64>) -> Result<(), Error> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| anyhow!("Wav writer already finalized"))?;
        writer.write_sample(value as f32).map_err(|e| e.into())
    }

    fn finalize(&mut self) -> Result<(), Error> {
        match self.writer.take() {
            Some(writer) => writer.finalize().map_err(|e| e.into()),
            None => Ok(()),
        }
    }
}

// One sample per line; blank lines and lines starting with '#' are skipped.
fn text_samples<R: Read + 'static>(r: R) -> Samples {
    let lines = BufReader::new(r).lines().enumerate();
    Box::new(lines.filter_map(|(idx, line)| {
        let line = match line {
            Ok(line) => line,
            Err(e) => return Some(Err(e.into())),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        Some(
            trimmed
                .parse::<f64>()
                .with_context(|| format!("Invalid sample \"{}\" on line {}", trimmed, idx + 1)),
        )
    }))
}

fn wav_samples<R: Read + 'static>(wav: WavReader<R>) -> Result<Samples, Error> {
    let spec = wav.spec();
    if spec.channels != 1 {
        return Err(anyhow!(
            "Expected a mono wav file, found {} channels",
            spec.channels
        ));
    }
    match spec.sample_format {
        SampleFormat::Int => {
            let bits_per_sample = spec.bits_per_sample;
            if bits_per_sample == 0 || bits_per_sample > 32 {
                return Err(anyhow!("Unsupported bit depth {}", bits_per_sample));
            }
            let scale = (1u64 << (bits_per_sample - 1)) as f64;
            Ok(Box::new(
                wav.into_samples::<i32>()
                    .map(move |s| s.map(|s| s as f64 / scale).map_err(|e| e.into())),
            ))
        }
        SampleFormat::Float => Ok(Box::new(
            wav.into_samples::<f32>()
                .map(|s| s.map(|s| s as f64).map_err(|e| e.into())),
        )),
    }
}

// Wav headers store the rate as a whole number of Hz.
fn wav_sample_rate(sample_period: f64) -> Result<u32, Error> {
    let rate = sample_period.recip().round();
    if rate >= 1.0 && rate <= u32::MAX as f64 {
        Ok(rate as u32)
    } else {
        Err(anyhow!(
            "A sample rate of {} Hz cannot be written to a wav file",
            sample_period.recip()
        ))
    }
}

fn parse_positive(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(x) if x.is_finite() && x > 0.0 => Ok(x),
        Ok(_) => Err(String::from("must be a positive number")),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let matches = Command::new("cfilter")
        .version(crate_version!())
        .about("Run a signal through a second-order lowpass or highpass filter")
        .arg(arg!(<INPUT> "input file (one sample per line, or a mono wav file)"))
        .arg(arg!(<OUTPUT> "output file"))
        .arg(
            arg!(--kind <KIND> "which filter to apply")
                .required(false)
                .possible_values(["lowpass", "highpass"])
                .default_value("lowpass"),
        )
        .arg(arg!(--cutoff <HZ> "the cutoff frequency, in Hz").validator(parse_positive))
        .arg(
            arg!(--"sample-rate" <RATE> "the sample rate, in Hz (wav input defaults to the file's rate)")
                .required(false)
                .validator(parse_positive)
                .conflicts_with("sample-period"),
        )
        .arg(
            arg!(--"sample-period" <SECONDS> "the time between samples, in seconds")
                .required(false)
                .validator(parse_positive),
        )
        .arg(arg!(--"wav-in" "the input is a wav file (default is to detect wav files by their filename)"))
        .arg(arg!(--"wav-out" "the output is a wav file (default is to detect wav files by their filename)"))
        .arg(arg!(--derivative "for the lowpass filter, also write the derivative (text output only)"))
        .get_matches();

    let in_name = matches.value_of("INPUT").unwrap();
    let out_name = matches.value_of("OUTPUT").unwrap();
    let in_wav =
        matches.is_present("wav-in") || Path::new(in_name).extension() == Some("wav".as_ref());
    let out_wav =
        matches.is_present("wav-out") || Path::new(out_name).extension() == Some("wav".as_ref());
    let in_file = BufReader::new(
        File::open(in_name)
            .with_context(|| format!("Failed to open input file \"{}\"", in_name))?,
    );

    let cutoff = parse_positive(matches.value_of("cutoff").unwrap()).map_err(Error::msg)?;
    let rate = matches
        .value_of("sample-rate")
        .map(parse_positive)
        .transpose()
        .map_err(Error::msg)?;
    let period = matches
        .value_of("sample-period")
        .map(parse_positive)
        .transpose()
        .map_err(Error::msg)?;

    let (samples, file_rate) = if in_wav {
        let wav_reader = WavReader::new(in_file)?;
        let file_rate = wav_reader.spec().sample_rate as f64;
        (wav_samples(wav_reader)?, Some(file_rate))
    } else {
        (text_samples(in_file), None)
    };

    let config = match (period, rate.or(file_rate)) {
        (Some(period), _) => FilterConfig::new(cutoff, period),
        (None, Some(rate)) => FilterConfig::from_sample_rate(cutoff, rate),
        (None, None) => {
            return Err(anyhow!(
                "For text input, either --sample-rate or --sample-period is required"
            )
            .into())
        }
    }
    .context("Invalid filter configuration")?;
    if cutoff * config.sample_period() >= 0.5 {
        log::warn!(
            "cutoff {} Hz is at or above the Nyquist frequency for a {} s sample period",
            cutoff,
            config.sample_period()
        );
    }

    let wav_rate = if out_wav {
        Some(wav_sample_rate(config.sample_period())?)
    } else {
        None
    };

    let out_file = BufWriter::new(
        File::create(out_name)
            .with_context(|| format!("Failed to open output file \"{}\"", out_name))?,
    );
    let mut writer: Box<dyn SampleWriter> = if let Some(sample_rate) = wav_rate {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        Box::new(WavSampleWriter {
            writer: Some(WavWriter::new(out_file, spec)?),
        })
    } else {
        Box::new(TextSampleWriter { writer: out_file })
    };

    let with_derivative = matches.is_present("derivative") && !out_wav;
    let mut count = 0usize;
    match matches.value_of("kind") {
        Some("highpass") => {
            let mut highpass = Highpass::new(&config);
            for sample in samples {
                writer.write_sample(highpass.update(sample?).value, None)?;
                count += 1;
            }
        }
        _ => {
            let mut lowpass = Lowpass::new(&config);
            for sample in samples {
                let out = lowpass.update(sample?);
                let derivative = if with_derivative {
                    Some(out.derivative)
                } else {
                    None
                };
                writer.write_sample(out.value, derivative)?;
                count += 1;
            }
        }
    }
    writer.finalize()?;
    log::info!("filtered {} samples into \"{}\"", count, out_name);

    Ok(())
}
