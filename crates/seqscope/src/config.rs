//! Application configuration from CLI flags and environment.

use clap::{Parser, Subcommand};
use seqscope_core::registry::Params;
use seqscope_oeis::DEFAULT_BASE_URL;

/// Browse integer sequences and their prime factorizations.
#[derive(Parser, Debug)]
#[command(name = "seqscope", version, about)]
pub struct AppConfig {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// First index to print (defaults to the sequence's first index).
    #[arg(short, long, global = true, allow_negative_numbers = true)]
    pub start: Option<i64>,

    /// Number of entries to print.
    #[arg(short = 'n', long, global = true, default_value = "10")]
    pub count: u64,

    /// Also print each entry's factorization.
    #[arg(short, long, global = true)]
    pub factors: bool,

    /// Entries computed per cache block (0 for the default).
    #[arg(long, global = true, default_value = "0")]
    pub cache_block: u64,

    /// Emit a JSON array instead of text lines.
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Catalog backend for OEIS sequences.
    #[arg(long, global = true, env = "SEQSCOPE_BACKEND_URL", default_value = DEFAULT_BASE_URL)]
    pub backend_url: String,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

/// Sequence to browse.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the locally computed sequence families.
    List,

    /// The natural numbers.
    Naturals {
        /// Start at 0 instead of 1.
        #[arg(long)]
        include_zero: bool,

        /// Last valid index.
        #[arg(long)]
        last: Option<String>,
    },

    /// The same value at every nonnegative index.
    Constant {
        #[arg(allow_negative_numbers = true)]
        value: String,
    },

    /// Uniform random integers.
    Random {
        #[arg(long, allow_negative_numbers = true)]
        min: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        max: Option<i64>,

        /// Seed for reproducible draws.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// An integer formula in n, e.g. "n^2 + 1".
    Formula {
        formula: String,

        /// First valid index.
        #[arg(long, allow_negative_numbers = true)]
        first: Option<i64>,

        /// Last valid index.
        #[arg(long)]
        last: Option<String>,
    },

    /// A sequence fetched from the OEIS.
    Oeis {
        /// A-number, e.g. A000045.
        id: String,

        /// Entries to request from the catalog (0 for the default).
        #[arg(long, default_value = "0")]
        fetch: u64,

        /// Reduce values modulo this (0 leaves them unchanged).
        #[arg(long, default_value = "0")]
        modulus: String,

        /// Display name.
        #[arg(long)]
        name: Option<String>,

        /// Print the export key before the entries.
        #[arg(long)]
        show_key: bool,
    },

    /// An OEIS sequence rebuilt from its export key.
    Key {
        key: String,

        /// Print the export key before the entries.
        #[arg(long)]
        show_key: bool,
    },
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parameters for a locally computed family, or `None` for other commands.
    #[must_use]
    pub fn family_params(&self) -> Option<(&'static str, Params)> {
        let mut params = Params::new();
        let mut set = |key: &str, value: String| {
            params.insert(key.to_string(), value);
        };
        set("cache_block", self.cache_block.to_string());
        let family = match self.command.as_ref()? {
            Command::Naturals { include_zero, last } => {
                set("include_zero", include_zero.to_string());
                if let Some(last) = last {
                    set("last", last.clone());
                }
                "naturals"
            }
            Command::Constant { value } => {
                set("value", value.clone());
                "constant"
            }
            Command::Random { min, max, seed } => {
                for (key, value) in [("min", *min), ("max", *max)] {
                    if let Some(v) = value {
                        set(key, v.to_string());
                    }
                }
                if let Some(seed) = seed {
                    set("seed", seed.to_string());
                }
                "random"
            }
            Command::Formula {
                formula,
                first,
                last,
            } => {
                set("formula", formula.clone());
                if let Some(first) = first {
                    set("first", first.to_string());
                }
                if let Some(last) = last {
                    set("last", last.clone());
                }
                "formula"
            }
            Command::List | Command::Oeis { .. } | Command::Key { .. } => return None,
        };
        Some((family, params))
    }
}
