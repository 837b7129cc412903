//! Interactive collection of parameter values.
//!
//! The collector walks the declared names in order, prompting for each with
//! the cached value offered as the default. A prompt that yields no value
//! omits that parameter entirely; it is neither passed as an empty string nor
//! written back to the cache, and collection continues with the next name.
use crate::cache::ParamCache;
use crate::invoke::ParamValue;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Source of interactively supplied values.
///
/// `Ok(None)` means no value was supplied for this prompt.
pub trait Prompter {
    fn prompt(&mut self, prompt: &str, initial: Option<&str>) -> Result<Option<String>>;
}

/// Prompter over stdin/stdout.
///
/// The cached default is shown in brackets; an empty reply accepts it. An
/// empty reply with no default, or end of input, counts as no value.
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn prompt(&mut self, prompt: &str, initial: Option<&str>) -> Result<Option<String>> {
        match initial {
            Some(default) => print!("{prompt} [{default}]: "),
            None => print!("{prompt}: "),
        }
        std::io::stdout().flush().context("flush prompt")?;

        let mut reply = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut reply)
            .context("read prompt reply")?;
        if read == 0 {
            return Ok(None);
        }
        let reply = reply.trim_end_matches(['\n', '\r']);
        if reply.is_empty() {
            return Ok(initial.map(str::to_string));
        }
        Ok(Some(reply.to_string()))
    }
}

/// Collect a value for each declared parameter name, in order.
///
/// Every supplied value updates the cache, including re-entries of unchanged
/// values; the cache is written back once at the end of the pass.
pub fn collect_parameters(
    names: &[String],
    cache: &mut ParamCache,
    prompter: &mut dyn Prompter,
) -> Result<Vec<ParamValue>> {
    let mut collected = Vec::new();
    for name in names {
        let cached = cache.get(name).map(str::to_string);
        let prompt = format!("Enter value for parameter \"{name}\"");
        match prompter.prompt(&prompt, cached.as_deref())? {
            Some(value) => {
                cache.insert(name, &value);
                collected.push(ParamValue {
                    name: name.clone(),
                    value,
                });
            }
            None => tracing::debug!("parameter {name} skipped, omitting from invocation"),
        }
    }
    cache.save()?;
    Ok(collected)
}
