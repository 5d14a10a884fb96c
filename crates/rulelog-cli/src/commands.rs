//! CLI command definitions and handlers

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rulelog_core::{Node, Rel, RuleSet};
use rulelog_engine::{DependencyGraph, EngineBuilder, EngineKind, EngineOptions, InferenceView};
use rulelog_rdfs::{Taxonomy, Vocabulary};
use rulelog_rules::{parse_atom, parse_document, parse_rule_set, Statement};
use rulelog_store::{RelSource, RelStore};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Main CLI structure
#[derive(Parser, Debug)]
#[command(name = "rulelog")]
#[command(about = "Rule-based inference over relations and RDF triples")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Materialise every fact derivable from the data
    Infer {
        #[command(flatten)]
        engine: EngineArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Answer a pattern through an inference view
    Query {
        #[command(flatten)]
        engine: EngineArgs,

        /// Pattern such as `ancestor(:a, ?y)` or `(?s, rdf:type, _)`
        pattern: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the closure sets of a class or property
    Taxonomy {
        /// Fact file holding the schema triples
        #[arg(short, long)]
        vocab: PathBuf,

        /// Engine options as JSON, for the vocabulary IRIs
        #[arg(long)]
        config: Option<PathBuf>,

        /// Term to inspect
        term: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate a rule file
    Check {
        /// Rule file
        #[arg(short, long)]
        rules: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Inputs and overrides shared by `infer` and `query`
#[derive(Args, Debug, Clone, PartialEq)]
pub struct EngineArgs {
    /// Rule file
    #[arg(short, long)]
    pub rules: PathBuf,

    /// Fact file
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Fact file holding schema triples; enables RDFS entailment
    #[arg(long)]
    pub vocab: Option<PathBuf>,

    /// Engine kind, e.g. forward-semi-naive or backward-sld
    #[arg(short, long)]
    pub engine: Option<EngineKind>,

    /// Engine options as JSON
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fail after this many forward rounds
    #[arg(long)]
    pub max_rounds: Option<usize>,

    /// Fail after this many milliseconds of forward evaluation
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    JsonPretty,
}

/// Command execution result
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    /// Rendered output, ready for stdout
    pub output: String,
    pub data: Option<Value>,
}

/// Execute CLI commands
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor {
    /// Options used when no `--config` file is given
    defaults: EngineOptions,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: EngineOptions) -> Self {
        Self { defaults }
    }

    /// Execute a CLI command
    pub fn execute(&self, command: Commands) -> Result<CommandResult> {
        match command {
            Commands::Infer { engine, format } => self.execute_infer(&engine, format),
            Commands::Query { engine, pattern, format } => self.execute_query(&engine, &pattern, format),
            Commands::Taxonomy {
                vocab,
                config,
                term,
                format,
            } => self.execute_taxonomy(&vocab, config.as_deref(), &term, format),
            Commands::Check { rules, format } => self.execute_check(&rules, format),
        }
    }

    fn execute_infer(&self, args: &EngineArgs, format: OutputFormat) -> Result<CommandResult> {
        let options = self.options(args.config.as_deref(), Some(args))?;
        let rules = load_rules(&args.rules)?;
        let data = load_facts(args.data.as_deref())?;
        let kind = options.kind;
        info!(%kind, rules = rules.len(), facts = data.len(), "running inference");

        let mut builder = EngineBuilder::new().kind(kind).rules(rules).options(options.clone());
        if let Some(vocab) = &args.vocab {
            builder = builder.taxonomy(Arc::new(load_taxonomy(vocab, &options)?.0));
        }

        let (store, stats) = if kind.is_forward() {
            let (store, stats) = builder.build_forward()?.exec_with_stats(&data)?;
            (store, Some(stats))
        } else {
            (builder.build()?.exec(&data)?, None)
        };

        let facts: Vec<String> = store.sorted().iter().map(|rel| rel.to_string()).collect();
        let data = json!({
            "engine": kind,
            "facts": facts,
            "statistics": store.statistics(),
            "stats": stats,
        });

        Ok(CommandResult {
            success: true,
            message: format!("Derived a store of {} facts", store.len()),
            output: render(format, store.to_string(), &data)?,
            data: Some(data),
        })
    }

    fn execute_query(&self, args: &EngineArgs, pattern: &str, format: OutputFormat) -> Result<CommandResult> {
        let options = self.options(args.config.as_deref(), Some(args))?;
        let rules = load_rules(&args.rules)?;
        let data = load_facts(args.data.as_deref())?;
        let pattern = parse_atom(pattern, rules.prefixes()).with_context(|| format!("invalid pattern `{}`", pattern))?;

        let mut builder = InferenceView::<Node>::builder()
            .base(&data)
            .rules(rules)
            .kind(options.kind)
            .options(options.clone());
        if let Some(vocab) = &args.vocab {
            builder = builder.taxonomy(Arc::new(load_taxonomy(vocab, &options)?.0));
        }
        let view = builder.build()?;

        let mut answers: Vec<Rel<Node>> = view.find(&pattern).collect();
        answers.sort();
        debug!(pattern = %pattern, answers = answers.len(), "query answered");

        let mut text = String::new();
        for answer in &answers {
            writeln!(text, "{} .", answer)?;
        }
        let rendered: Vec<String> = answers.iter().map(|rel| rel.to_string()).collect();
        let data = json!({
            "engine": view.kind(),
            "pattern": pattern.to_string(),
            "answers": rendered,
        });

        Ok(CommandResult {
            success: true,
            message: format!("Found {} answers", answers.len()),
            output: render(format, text, &data)?,
            data: Some(data),
        })
    }

    fn execute_taxonomy(
        &self,
        vocab: &Path,
        config: Option<&Path>,
        term: &str,
        format: OutputFormat,
    ) -> Result<CommandResult> {
        let options = self.options(config, None)?;
        let (taxonomy, prefixes) = load_taxonomy(vocab, &options)?;
        let node = expand_term(term, &prefixes);

        let sorted = |set: &HashSet<Node>| -> Vec<String> {
            let mut values: Vec<String> = set.iter().map(Node::to_string).collect();
            values.sort();
            values
        };
        let sections = [
            ("super_classes", sorted(taxonomy.super_classes(&node))),
            ("sub_classes", sorted(taxonomy.sub_classes(&node))),
            ("super_properties", sorted(taxonomy.super_properties(&node))),
            ("sub_properties", sorted(taxonomy.sub_properties(&node))),
            ("domain", sorted(taxonomy.domain(&node))),
            ("range", sorted(taxonomy.range(&node))),
        ];

        let mut text = String::new();
        for (name, values) in &sections {
            writeln!(text, "{}: {}", name.replace('_', " "), values.join(" "))?;
        }
        let mut data: serde_json::Map<String, Value> =
            sections.iter().map(|(name, values)| (name.to_string(), json!(values))).collect();
        data.insert("term".to_string(), json!(node.as_str()));
        let data = Value::Object(data);

        Ok(CommandResult {
            success: true,
            message: format!("Taxonomy of {}", node),
            output: render(format, text, &data)?,
            data: Some(data),
        })
    }

    fn execute_check(&self, path: &Path, format: OutputFormat) -> Result<CommandResult> {
        let source = read(path, "rules")?;

        let rules = match parse_rule_set(&source) {
            Ok(rules) => rules,
            Err(err) => {
                let data = json!({
                    "valid": false,
                    "error": err.kind.to_string(),
                    "line": err.line,
                    "column": err.column,
                });
                return Ok(CommandResult {
                    success: false,
                    message: format!("{}:{}", path.display(), err),
                    output: render(format, format!("{}:{}\n", path.display(), err), &data)?,
                    data: Some(data),
                });
            }
        };

        let cycle = DependencyGraph::new(&rules).find_cycle();
        let mut text = format!("{} rules, {} facts\n", rules.len(), rules.facts().len());
        match &cycle {
            Some(cycle) => writeln!(text, "recursive: {} (backward-sld unavailable)", cycle)?,
            None => writeln!(text, "non-recursive")?,
        }
        let data = json!({
            "valid": true,
            "rules": rules.len(),
            "facts": rules.facts().len(),
            "prefixes": rules.prefixes(),
            "imports": rules.imports(),
            "recursive": cycle.is_some(),
            "cycle": cycle,
        });

        Ok(CommandResult {
            success: true,
            message: format!("{} is valid", path.display()),
            output: render(format, text, &data)?,
            data: Some(data),
        })
    }

    /// Options from `config` (or the defaults), then the flag overrides
    fn options(&self, config: Option<&Path>, args: Option<&EngineArgs>) -> Result<EngineOptions> {
        let mut options = match config {
            Some(path) => EngineOptions::from_json(&read(path, "engine options")?)
                .with_context(|| format!("invalid engine options in {}", path.display()))?,
            None => self.defaults.clone(),
        };

        if let Some(args) = args {
            if let Some(kind) = args.engine {
                options.kind = kind;
            }
            if args.max_rounds.is_some() {
                options.max_rounds = args.max_rounds;
            }
            if args.timeout_ms.is_some() {
                options.timeout_ms = args.timeout_ms;
            }
        }
        Ok(options)
    }
}

fn read(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {} from {}", what, path.display()))
}

fn load_rules(path: &Path) -> Result<RuleSet<Node>> {
    let source = read(path, "rules")?;
    parse_rule_set(&source).with_context(|| format!("invalid rule file {}", path.display()))
}

/// Facts of a document, plus the prefixes it declares
fn load_document(path: &Path, what: &str) -> Result<(RelStore<Node>, BTreeMap<String, String>)> {
    let source = read(path, what)?;
    let document = parse_document(&source).with_context(|| format!("invalid {} file {}", what, path.display()))?;

    let mut store = RelStore::new();
    for (statement, _) in document.statements {
        match statement {
            Statement::Fact(fact) => {
                store.add(fact);
            }
            Statement::Rule(rule) => bail!("{}: {} files hold facts only, found `{}`", path.display(), what, rule),
        }
    }
    Ok((store, document.prefixes))
}

fn load_facts(path: Option<&Path>) -> Result<RelStore<Node>> {
    match path {
        Some(path) => Ok(load_document(path, "data")?.0),
        None => Ok(RelStore::new()),
    }
}

fn load_taxonomy(path: &Path, options: &EngineOptions) -> Result<(Taxonomy<Node>, BTreeMap<String, String>)> {
    let (schema, prefixes) = load_document(path, "vocabulary")?;
    let vocabulary = Vocabulary::from_config(&options.vocabulary)?;
    let taxonomy = Taxonomy::new(&schema, &vocabulary, options.include_derived_data_rdfs);
    debug!(schema = schema.len(), "taxonomy loaded");
    Ok((taxonomy, prefixes))
}

/// `<iri>` is unwrapped; `prefix:local` expands when the prefix is declared
fn expand_term(term: &str, prefixes: &BTreeMap<String, String>) -> Node {
    if let Some(iri) = term.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        return Node::new(iri);
    }
    match term.split_once(':') {
        Some((prefix, local)) => match prefixes.get(prefix) {
            Some(namespace) => Node::new(format!("{}{}", namespace, local)),
            None => Node::new(term),
        },
        None => Node::new(term),
    }
}

fn render(format: OutputFormat, text: String, data: &Value) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => text,
        OutputFormat::Json => format!("{}\n", serde_json::to_string(data)?),
        OutputFormat::JsonPretty => format!("{}\n", serde_json::to_string_pretty(data)?),
    })
}
