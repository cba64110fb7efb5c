// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::export::DEFAULT_SIZE;
use crate::Error;

use clap::{App, Arg, ArgMatches};
use log::Level;
use serde_derive::*;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_width() -> u32 {
    DEFAULT_SIZE.0
}

fn default_height() -> u32 {
    DEFAULT_SIZE.1
}

fn default_datasets() -> Vec<Dataset> {
    vec![
        Dataset::new("speedup_pipeline.csv", "Speedup-Pipeline", "speedup-pipeline.png"),
        Dataset::new("speedup_bsp.csv", "Speedup-BSP", "speedup-bsp.png"),
    ]
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(default = "default_directory")]
    directory: PathBuf,
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
}

impl Default for General {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            width: default_width(),
            height: default_height(),
        }
    }
}

/// One chart to produce: where its data comes from, what it is called and
/// where the image goes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    input: PathBuf,
    title: String,
    output: PathBuf,
}

impl Dataset {
    pub fn new(input: impl Into<PathBuf>, title: impl AsRef<str>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            title: title.as_ref().to_owned(),
            output: output.into(),
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    fn within(&self, directory: &Path) -> Self {
        Self {
            input: directory.join(&self.input),
            title: self.title.clone(),
            output: directory.join(&self.output),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default = "default_datasets")]
    dataset: Vec<Dataset>,
    #[serde(skip)]
    verbose: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: Default::default(),
            dataset: default_datasets(),
            verbose: 0,
        }
    }
}

impl Config {
    /// parse command line options and return `Config`
    pub fn new() -> Result<Self, Error> {
        Self::from_args(std::env::args_os())
    }

    pub fn from_args<I, T>(args: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app().get_matches_from(args);

        let mut config = if let Some(file) = matches.value_of("config") {
            Self::load_from_file(file)?
        } else {
            Default::default()
        };

        if let Some(directory) = matches.value_of("directory") {
            config.general.directory = PathBuf::from(directory);
        }
        if let Some(width) = parse_numeric_arg(&matches, "width")? {
            config.general.width = width;
        }
        if let Some(height) = parse_numeric_arg(&matches, "height")? {
            config.general.height = height;
        }
        config.verbose = matches.occurrences_of("verbose");

        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&content, path)
    }

    pub fn load_from_str<P: AsRef<Path>>(content: &str, origin: P) -> Result<Self, Error> {
        let config_error = |message: String| Error::Config {
            path: origin.as_ref().to_path_buf(),
            message,
        };

        let config: Config = toml::from_str(content).map_err(|e| config_error(e.to_string()))?;
        if config.dataset.is_empty() {
            return Err(config_error("no datasets".to_owned()));
        }
        if config.general.width == 0 || config.general.height == 0 {
            return Err(config_error(format!(
                "image size {}x{} is empty",
                config.general.width, config.general.height
            )));
        }
        Ok(config)
    }

    pub fn logging(&self) -> Level {
        match self.verbose {
            0 => Level::Info,
            1 => Level::Debug,
            _ => Level::Trace,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.general.width, self.general.height)
    }

    /// Datasets with paths resolved against the working directory.
    pub fn datasets(&self) -> Vec<Dataset> {
        self.dataset
            .iter()
            .map(|d| d.within(&self.general.directory))
            .collect()
    }

    pub fn print(&self) {
        info!("-----");
        info!("Config:");
        info!("Directory: {}", self.general.directory.display());
        info!("Image size: {}x{}", self.general.width, self.general.height);
        for dataset in &self.dataset {
            info!(
                "Dataset: {} -> {} ({})",
                dataset.input.display(),
                dataset.output.display(),
                dataset.title
            );
        }
        info!("-----");
    }
}

fn app() -> App<'static, 'static> {
    App::new(NAME)
        .version(VERSION)
        .about("Render speedup charts from pipeline and BSP benchmark results")
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("directory")
                .long("directory")
                .value_name("DIR")
                .help("Directory holding the input CSVs and receiving the charts")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .value_name("Pixels")
                .help("Chart width")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .value_name("Pixels")
                .help("Chart height")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Increase verbosity by one level. Can be used more than once")
                .multiple(true),
        )
}

fn parse_numeric_arg(matches: &ArgMatches, key: &'static str) -> Result<Option<u32>, Error> {
    match matches.value_of(key) {
        None => Ok(None),
        Some(value) => match value.parse::<u32>() {
            Ok(v) if v > 0 => Ok(Some(v)),
            _ => Err(Error::Argument {
                name: key,
                value: value.to_owned(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_datasets() {
        let config = Config::from_args(vec!["speedup-graphs"]).unwrap();
        let datasets = config.datasets();
        assert_eq!(datasets.len(), 2);

        assert_eq!(datasets[0].input(), Path::new("./speedup_pipeline.csv"));
        assert_eq!(datasets[0].title(), "Speedup-Pipeline");
        assert_eq!(datasets[0].output(), Path::new("./speedup-pipeline.png"));

        assert_eq!(datasets[1].input(), Path::new("./speedup_bsp.csv"));
        assert_eq!(datasets[1].title(), "Speedup-BSP");
        assert_eq!(datasets[1].output(), Path::new("./speedup-bsp.png"));

        assert_eq!(config.size(), (640, 480));
        assert_eq!(config.logging(), Level::Info);
    }

    #[test]
    fn flags_override() {
        let config = Config::from_args(vec![
            "speedup-graphs",
            "--directory",
            "results",
            "--width",
            "1920",
            "-vv",
        ])
        .unwrap();
        assert_eq!(config.size(), (1920, 480));
        assert_eq!(config.logging(), Level::Trace);
        assert_eq!(
            config.datasets()[1].input(),
            Path::new("results/speedup_bsp.csv")
        );
    }

    #[test]
    fn bad_flag_value() {
        assert!(matches!(
            Config::from_args(vec!["speedup-graphs", "--height", "tall"]),
            Err(Error::Argument { name: "height", .. })
        ));
        assert!(matches!(
            Config::from_args(vec!["speedup-graphs", "--width", "0"]),
            Err(Error::Argument { name: "width", .. })
        ));
    }

    #[test]
    fn toml_datasets() {
        let config = Config::load_from_str(
            r#"
            [general]
            directory = "out"
            height = 720

            [[dataset]]
            input = "speedup_seq.csv"
            title = "Speedup-Sequential"
            output = "speedup-seq.png"
            "#,
            "speedup.toml",
        )
        .unwrap();
        assert_eq!(config.size(), (640, 720));
        assert_eq!(
            config.datasets(),
            vec![Dataset::new(
                "out/speedup_seq.csv",
                "Speedup-Sequential",
                "out/speedup-seq.png"
            )]
        );
    }

    #[test]
    fn toml_defaults() {
        let config = Config::load_from_str("", "speedup.toml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn toml_rejects() {
        for content in &[
            "dataset = []",
            "[general]\nwidth = 0",
            "[general]\ncolour = \"red\"",
        ] {
            assert!(matches!(
                Config::load_from_str(content, "speedup.toml"),
                Err(Error::Config { .. })
            ));
        }
    }
}
