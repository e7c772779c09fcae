use imgjob_model::{JobDescriptor, JobName, OutputTemplate, Partition, TasksPerNode};

use crate::script::{DIRECTIVE_PREFIX, ScriptError};

const JOB_NAME: &str = "job-name";
const PARTITION: &str = "partition";
const TASKS_PER_NODE: &str = "ntasks-per-node";
const OUTPUT: &str = "output";

/// One `#SBATCH` option, normalized to its long name without dashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub key: String,
    /// Empty for switches such as `--exclusive`.
    pub value: String,
    /// 1-based line number in the script.
    pub line: usize,
}

/// Directives of a script header, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives(Vec<Directive>);

impl Directives {
    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value of the last directive named `key` (the scheduler lets later
    /// options override earlier ones).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|d| d.key == key)
            .map(|d| d.value.as_str())
    }

    /// The resource request declared by the header.
    ///
    /// All four options of a build job must be present.
    pub fn descriptor(&self) -> Result<JobDescriptor, ScriptError> {
        let name: JobName = self.required(JOB_NAME)?;
        let partition: Partition = self.required(PARTITION)?;
        let tasks_per_node: TasksPerNode = self.required(TASKS_PER_NODE)?;
        let output: OutputTemplate = self.required(OUTPUT)?;

        Ok(JobDescriptor {
            name,
            partition,
            tasks_per_node,
            output,
        })
    }

    fn required<T>(&self, key: &'static str) -> Result<T, ScriptError>
    where
        T: std::str::FromStr<Err = imgjob_model::ModelError>,
    {
        let raw = self.get(key).ok_or(ScriptError::MissingDirective(key))?;
        raw.parse()
            .map_err(|source| ScriptError::InvalidValue { key, source })
    }
}

/// Short options the scheduler accepts for the keys a build job uses.
fn long_name(short: &str) -> Option<&'static str> {
    match short {
        "J" => Some(JOB_NAME),
        "p" => Some(PARTITION),
        "o" => Some(OUTPUT),
        _ => None,
    }
}

/// Parse the `#SBATCH` header of a batch script.
///
/// Like the scheduler, scanning stops at the first executable line; later
/// `#SBATCH` lines are ordinary comments. Accepted forms are `--opt=value`,
/// `--opt value`, `-X value` and `-Xvalue`.
pub fn parse_directives(script: &str) -> Result<Directives, ScriptError> {
    let mut out = Vec::new();

    for (idx, raw) in script.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() {
            continue;
        }
        let Some(rest) = line.strip_prefix(DIRECTIVE_PREFIX) else {
            if line.starts_with('#') {
                continue;
            }
            break;
        };
        // `#SBATCHED` is not a directive.
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            continue;
        }

        let words = split_words(rest).map_err(|reason| ScriptError::Malformed {
            line: line_no,
            reason,
        })?;
        parse_options(&words, line_no, &mut out)?;
    }
    Ok(Directives(out))
}

fn parse_options(
    words: &[String],
    line: usize,
    out: &mut Vec<Directive>,
) -> Result<(), ScriptError> {
    let mut i = 0;
    while i < words.len() {
        let word = &words[i];
        i += 1;

        let (key, inline) = if let Some(long) = word.strip_prefix("--") {
            match long.split_once('=') {
                Some((k, v)) => (k.to_string(), Some(v.to_string())),
                None => (long.to_string(), None),
            }
        } else if let Some(short) = word.strip_prefix('-') {
            let mut chars = short.chars();
            let flag = chars.next().map(String::from).unwrap_or_default();
            let attached: String = chars.collect();
            let key = long_name(&flag).map(str::to_string).unwrap_or(flag);
            (key, (!attached.is_empty()).then_some(attached))
        } else {
            return Err(ScriptError::Malformed {
                line,
                reason: format!("expected an option, found {word:?}"),
            });
        };

        if key.is_empty() {
            return Err(ScriptError::Malformed {
                line,
                reason: format!("empty option name in {word:?}"),
            });
        }

        let value = match inline {
            Some(v) => v,
            None => match words.get(i) {
                Some(next) if !next.starts_with('-') => {
                    i += 1;
                    next.clone()
                }
                _ => String::new(),
            },
        };
        out.push(Directive { key, value, line });
    }
    Ok(())
}

/// Split a directive line into shell words.
///
/// Handles single quotes, double quotes and backslash escapes; an unquoted
/// `#` starting a word begins a trailing comment.
fn split_words(s: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut cur = String::new();
    let mut in_word = false;
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut cur));
                    in_word = false;
                }
            }
            '#' if !in_word => break,
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => cur.push(c),
                        None => return Err("unterminated single quote".into()),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c) => cur.push(c),
                            None => return Err("unterminated double quote".into()),
                        },
                        Some(c) => cur.push(c),
                        None => return Err("unterminated double quote".into()),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(c) = chars.next() {
                    cur.push(c);
                }
            }
            c => {
                in_word = true;
                cur.push(c);
            }
        }
    }
    if in_word {
        words.push(cur);
    }
    Ok(words)
}

/// Lines of the script the shell would execute: everything that is neither
/// blank nor a comment.
pub fn executable_statements(script: &str) -> Vec<&str> {
    script
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect()
}
