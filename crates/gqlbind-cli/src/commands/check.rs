use crate::output_utils;
use crate::request_file;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use crate::commands::KindArg;
use gqlbind::OperationKind;
use gqlbind::document::RequestTemplate;
use gqlbind::schema::SchemaRegistry;
use std::collections::HashSet;
use std::fmt::Write;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Debug, clap::Args)]
pub(crate) struct CheckCmd {
    #[arg(
        default_values_t=["graphql".to_string()],
        help="Set of file extensions to filter to when searching for request \
             files within a directory.",
        long,
        value_delimiter = ',',
    )]
    graphql_file_exts: Vec<String>,

    #[arg(
        help="Operation kind to assemble every request as. Defaults to the \
             kind named in each file's operation header, or `query`.",
        long,
        value_enum,
    )]
    kind: Option<KindArg>,

    #[arg(
        help="SDL file(s) describing the server's schema. Without one, only \
             the built-in scalars are known.",
        long,
    )]
    schema: Vec<PathBuf>,

    #[arg(
        help="Paths to one or more request files or directories containing \
             request files.",
        name="FILE_OR_DIR_PATHS",
        required=true,
    )]
    file_or_dir_paths: Vec<PathBuf>,
}
impl CheckCmd {
    fn collect_files(&self) -> (Vec<PathBuf>, Vec<String>) {
        let graphql_file_exts: HashSet<String> =
            self.graphql_file_exts.iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect();

        log::debug!(
            "Scanning {} input paths...",
            self.file_or_dir_paths.len(),
        );
        let mut errors = vec![];
        let mut file_paths = vec![];
        for path in &self.file_or_dir_paths {
            // A file named explicitly is checked whatever its extension.
            if path.is_file() {
                file_paths.push(path.to_owned());
                continue;
            }
            for entry in WalkDir::new(path.as_path()).follow_links(true).sort_by_file_name() {
                match entry {
                    Ok(entry) => {
                        let path = entry.path();
                        if !entry.file_type().is_file() {
                            log::trace!("Skipping non-file: {path:#?}.");
                            continue;
                        }
                        if let Some(ext) = path.extension().map(|s| s.to_string_lossy())
                            && graphql_file_exts.contains(ext.as_ref()) {
                            log::trace!("Found request file at {path:#?}.");
                            file_paths.push(path.to_owned());
                        }
                    },

                    Err(e) => {
                        log::trace!(
                            "Encountered an error while iterating recursive \
                            filesystem entities at/under {path:#?}."
                        );
                        errors.push(e.to_string());
                    },
                }
            }
        }
        (file_paths, errors)
    }

    fn check_file(
        &self,
        registry: &SchemaRegistry,
        path: &Path,
    ) -> anyhow::Result<RequestTemplate> {
        let source = request_file::read_request(path)?;
        let kind = self.kind
            .map(OperationKind::from)
            .unwrap_or_else(|| request_file::infer_kind(&source));
        RequestTemplate::assemble(registry, &source, None, kind).map_err(|errors| {
            anyhow::anyhow!(
                "{}",
                errors.iter()
                    .map(|err| format!("    - {err}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        })
    }
}

#[inherent::inherent]
impl RunnableCommand for CheckCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        let registry = match request_file::load_registry(&self.schema) {
            Ok(registry) => registry,
            Err(err) => return CommandResult::stderr(format_args!(
                "{} {err:#}",
                output_utils::RED_X,
            )),
        };

        let (file_paths, mut errors) = self.collect_files();
        log::debug!("Found {} request files to check.", file_paths.len());

        let mut report = String::new();
        let mut num_valid = 0;
        for path in &file_paths {
            match self.check_file(&registry, path) {
                Ok(template) => {
                    num_valid += 1;
                    let _ = writeln!(report, "{} {}", output_utils::GREEN_CHECK, path.display());
                    let _ = writeln!(
                        report,
                        "    {}{}",
                        template.kind(),
                        template.name().map(|name| format!(" {name}")).unwrap_or_default(),
                    );
                    for var_def in template.variables().values() {
                        let _ = writeln!(
                            report,
                            "    variable ${}: {}{}",
                            var_def.name(),
                            var_def.type_annotation(),
                            if var_def.is_required() { "" } else { " (optional)" },
                        );
                    }
                    for param in template.bind_parameters().values() {
                        let target_types = param.occurrences().iter()
                            .map(|occurrence| occurrence.target_type()
                                .map(|annot| annot.to_string())
                                .unwrap_or_else(|| "?".to_string()))
                            .collect::<Vec<_>>()
                            .join(", ");
                        let _ = writeln!(
                            report,
                            "    bind &{} ({} occurrences: {target_types})",
                            param.name(),
                            param.occurrences().len(),
                        );
                    }
                },
                Err(err) => errors.push(format!("{}:\n{err}", path.display())),
            }
        }

        if !errors.is_empty() {
            return CommandResult::stderr(format_args!(
                "{report}{} {} of {} request files failed to assemble:\n{}",
                output_utils::RED_X,
                file_paths.len() - num_valid,
                file_paths.len(),
                errors.join("\n"),
            ));
        }

        CommandResult::stdout(format_args!(
            "{report}{} All {num_valid} request files assembled successfully.",
            output_utils::GREEN_CHECK,
        ))
    }
}
