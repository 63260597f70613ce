//! Flavor registry.
//!
//! A flavor selects the parameter set collected during `maru init` and the
//! Dockerfile template used to package the project.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ProjectConfig;
use crate::prompt::Prompter;
use crate::{Error, Result};

const PYTHON_VERSIONS: &[&str] = &["2.7", "3.6", "3.7", "3.8", "3.9"];
const JDK_VERSIONS: &[&str] = &["8", "11", "17"];

/// Packaging flavor, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flavor {
    Custom,
    Executable,
    FijiMacro,
    JavaMaven,
    JavafxMaven,
    MatlabCompiled,
    PythonConda,
}

impl Flavor {
    pub const ALL: [Flavor; 7] = [
        Flavor::Custom,
        Flavor::Executable,
        Flavor::FijiMacro,
        Flavor::JavaMaven,
        Flavor::JavafxMaven,
        Flavor::MatlabCompiled,
        Flavor::PythonConda,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Flavor::Custom => "custom",
            Flavor::Executable => "executable",
            Flavor::FijiMacro => "fiji_macro",
            Flavor::JavaMaven => "java_maven",
            Flavor::JavafxMaven => "javafx_maven",
            Flavor::MatlabCompiled => "matlab_compiled",
            Flavor::PythonConda => "python_conda",
        }
    }

    /// Hardcoded parameters offered to a brand new project.
    pub fn defaults(self) -> Result<FlavorParams> {
        Ok(match self {
            Flavor::Custom => FlavorParams::Custom,
            Flavor::Executable => FlavorParams::Executable(ExecutableParams {
                build_command: "make".to_owned(),
                exe_path: "bin/main".to_owned(),
            }),
            Flavor::PythonConda => FlavorParams::PythonConda(PythonCondaParams {
                python_version: "3.7".to_owned(),
                dependencies: String::new(),
                script_path: "main.py".to_owned(),
            }),
            Flavor::JavaMaven => FlavorParams::JavaMaven(JavaMavenParams {
                build_command: "mvn package".to_owned(),
                jdk_version: "8".to_owned(),
                main_class: "org.myapp.MyClass".to_owned(),
            }),
            Flavor::JavafxMaven => FlavorParams::JavafxMaven(JavaMavenParams {
                build_command: "mvn package".to_owned(),
                jdk_version: "11".to_owned(),
                main_class: "org.myapp.MyClass".to_owned(),
            }),
            Flavor::FijiMacro => FlavorParams::FijiMacro(FijiMacroParams {
                plugin_dir: "fiji_plugins".to_owned(),
                macro_dir: "fiji_macros".to_owned(),
                macro_name: "macro.ijm".to_owned(),
            }),
            Flavor::MatlabCompiled => {
                return Err(Error::UnsupportedFlavor(self.as_str().to_owned()));
            }
        })
    }

    /// Collect this flavor's parameters interactively.
    ///
    /// Prompts are pre-filled from `config` when updating an existing project
    /// that already uses this flavor, and from [`Flavor::defaults`] otherwise.
    pub fn collect_params(
        self,
        prompter: &mut dyn Prompter,
        config: &ProjectConfig,
        is_new_project: bool,
    ) -> Result<FlavorParams> {
        if self == Flavor::MatlabCompiled {
            return Err(Error::UnsupportedFlavor(self.as_str().to_owned()));
        }

        let seed = if !is_new_project && config.flavor.flavor() == self {
            config.flavor.clone()
        } else {
            self.defaults()?
        };

        match seed {
            FlavorParams::Custom => Ok(FlavorParams::Custom),
            FlavorParams::Executable(p) => {
                let build_command = ask_required(prompter, "build command", "Build command:", &p.build_command)?;
                let exe_path = ask_required(
                    prompter,
                    "executable path",
                    "Relative path to the executable:",
                    &p.exe_path,
                )?;
                Ok(FlavorParams::Executable(ExecutableParams {
                    build_command,
                    exe_path,
                }))
            }
            FlavorParams::PythonConda(p) => {
                let python_version =
                    select_value(prompter, "Python version:", PYTHON_VERSIONS, &p.python_version)?;
                let raw = prompter.multiline(
                    "Dependencies to install with Conda (e.g. h5py=2.8.0):",
                    &p.dependencies,
                )?;
                let script_path = ask_required(
                    prompter,
                    "script path",
                    "Relative path to main script:",
                    &p.script_path,
                )?;
                Ok(FlavorParams::PythonConda(PythonCondaParams {
                    python_version,
                    dependencies: normalize_whitespace(&raw),
                    script_path,
                }))
            }
            FlavorParams::JavaMaven(p) => Ok(FlavorParams::JavaMaven(collect_java(prompter, p)?)),
            FlavorParams::JavafxMaven(p) => {
                Ok(FlavorParams::JavafxMaven(collect_java(prompter, p)?))
            }
            FlavorParams::FijiMacro(p) => {
                let plugin_dir = ask_required(
                    prompter,
                    "plugin directory",
                    "Relative path to Fiji plugins:",
                    &p.plugin_dir,
                )?;
                let macro_dir = ask_required(
                    prompter,
                    "macro directory",
                    "Relative path to Fiji macros:",
                    &p.macro_dir,
                )?;
                let macro_name = ask_required(
                    prompter,
                    "macro name",
                    "Name of the Fiji macro file to run:",
                    &p.macro_name,
                )?;
                Ok(FlavorParams::FijiMacro(FijiMacroParams {
                    plugin_dir,
                    macro_dir,
                    macro_name,
                }))
            }
            FlavorParams::MatlabCompiled => Err(Error::UnsupportedFlavor(self.as_str().to_owned())),
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flavor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Flavor::Custom);
        }
        Flavor::ALL
            .into_iter()
            .find(|f| f.as_str() == trimmed)
            .ok_or_else(|| Error::UnknownFlavor(trimmed.to_owned()))
    }
}

/// All registered flavor names in lexicographic order.
pub fn list_flavors() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Flavor::ALL.iter().map(|f| f.as_str()).collect();
    names.sort_unstable();
    names
}

/// Flavor-specific parameters, tagged by flavor name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum FlavorParams {
    #[default]
    Custom,
    Executable(ExecutableParams),
    PythonConda(PythonCondaParams),
    JavaMaven(JavaMavenParams),
    JavafxMaven(JavaMavenParams),
    FijiMacro(FijiMacroParams),
    MatlabCompiled,
}

impl FlavorParams {
    pub fn flavor(&self) -> Flavor {
        match self {
            FlavorParams::Custom => Flavor::Custom,
            FlavorParams::Executable(_) => Flavor::Executable,
            FlavorParams::PythonConda(_) => Flavor::PythonConda,
            FlavorParams::JavaMaven(_) => Flavor::JavaMaven,
            FlavorParams::JavafxMaven(_) => Flavor::JavafxMaven,
            FlavorParams::FijiMacro(_) => Flavor::FijiMacro,
            FlavorParams::MatlabCompiled => Flavor::MatlabCompiled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableParams {
    pub build_command: String,
    pub exe_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythonCondaParams {
    pub python_version: String,
    /// Conda package specs on a single line, separated by single spaces.
    #[serde(default)]
    pub dependencies: String,
    pub script_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaMavenParams {
    pub build_command: String,
    pub jdk_version: String,
    pub main_class: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FijiMacroParams {
    pub plugin_dir: String,
    pub macro_dir: String,
    pub macro_name: String,
}

impl FijiMacroParams {
    pub fn macro_path(&self) -> String {
        format!("{}/{}", self.macro_dir, self.macro_name)
    }
}

fn collect_java(prompter: &mut dyn Prompter, seed: JavaMavenParams) -> Result<JavaMavenParams> {
    let build_command = ask_required(prompter, "build command", "Build command:", &seed.build_command)?;
    let jdk_version = select_value(prompter, "JDK version:", JDK_VERSIONS, &seed.jdk_version)?;
    let main_class = ask_required(prompter, "main class", "Main class:", &seed.main_class)?;
    Ok(JavaMavenParams {
        build_command,
        jdk_version,
        main_class,
    })
}

fn ask_required(
    prompter: &mut dyn Prompter,
    field: &'static str,
    message: &str,
    default: &str,
) -> Result<String> {
    let value = prompter.input(message, default)?;
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::EmptyField { field });
    }
    Ok(value.to_owned())
}

/// Select from `choices`, keeping a current value that is not in the list.
fn select_value(
    prompter: &mut dyn Prompter,
    message: &str,
    choices: &[&str],
    current: &str,
) -> Result<String> {
    let mut options: Vec<&str> = choices.to_vec();
    if !current.is_empty() && !options.contains(&current) {
        options.push(current);
    }
    let default = options.iter().position(|o| *o == current).unwrap_or(0);
    let idx = prompter.select(message, &options, default)?;
    options
        .get(idx)
        .map(|s| (*s).to_owned())
        .ok_or_else(|| Error::Prompt(format!("selection {idx} out of range for '{message}'")))
}

/// Collapse every run of whitespace (including newlines) to a single space.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
