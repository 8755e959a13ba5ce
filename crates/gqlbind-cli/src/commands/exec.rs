use crate::output_utils;
use crate::request_file;
use crate::Cli;
use crate::ClientConfig;
use crate::CommandResult;
use crate::RunnableCommand;
use crate::commands::KindArg;
use anyhow::Context;
use gqlbind::OperationKind;
use gqlbind::binder::BoundRequest;
use gqlbind::document::RequestTemplate;
use gqlbind::response::ResponseEnvelope;
use gqlbind::transport::HttpTransport;
use gqlbind::transport::QueryTransport;
use gqlbind::transport::SubscriptionListener;
use gqlbind::transport::SubscriptionTransport;
use gqlbind::transport::TransportError;
use gqlbind::transport::WebSocketConfig;
use gqlbind::transport::WebSocketTransport;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::sync::mpsc;
use url::Url;

#[derive(Debug, clap::Args)]
pub(crate) struct ExecCmd {
    #[arg(
        help="Bind parameter value as `name=<json>`, or `name=NAME` for an \
             enum value. May be repeated.",
        long="bind",
        value_name="NAME=JSON",
    )]
    binds: Vec<String>,

    #[arg(
        help="JSON file with default endpoint, headers, timeout and schema \
             settings. Flags override its values.",
        long,
    )]
    config: Option<PathBuf>,

    #[arg(
        help="GraphQL endpoint to send the request to.",
        long,
    )]
    endpoint: Option<String>,

    #[arg(
        help="Extra request header as `name:value`. May be repeated.",
        long="header",
        value_name="NAME:VALUE",
    )]
    headers: Vec<String>,

    #[arg(
        help="Operation kind to assemble the request as. Defaults to the kind \
             named in the file's operation header, or `query`.",
        long,
        value_enum,
    )]
    kind: Option<KindArg>,

    #[arg(
        help="SDL file(s) describing the server's schema.",
        long,
    )]
    schema: Vec<PathBuf>,

    #[arg(
        help="WebSocket endpoint for subscriptions. Defaults to the \
             `--endpoint` URL with its scheme switched to ws(s).",
        long,
    )]
    subscription_endpoint: Option<String>,

    #[arg(
        help="Request timeout in seconds.",
        long,
    )]
    timeout_secs: Option<u64>,

    #[arg(
        help="GraphQL variable value as `name=<json>`. May be repeated.",
        long="var",
        value_name="NAME=JSON",
    )]
    vars: Vec<String>,

    #[arg(
        help="The request file to execute.",
        name="FILE",
    )]
    file: PathBuf,
}
impl ExecCmd {
    /// Flags layered over the config file, if any.
    fn resolve_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.to_owned());
        }
        if let Some(subscription_endpoint) = &self.subscription_endpoint {
            config.subscription_endpoint = Some(subscription_endpoint.to_owned());
        }
        if self.timeout_secs.is_some() {
            config.timeout_secs = self.timeout_secs;
        }
        if !self.schema.is_empty() {
            config.schema_files = self.schema.clone();
        }
        for header in &self.headers {
            let (name, value) = request_file::parse_header(header)?;
            config.headers.insert(name, value);
        }
        Ok(config)
    }

    fn bind(&self, config: &ClientConfig) -> anyhow::Result<BoundRequest> {
        let registry = request_file::load_registry(&config.schema_files)?;
        let source = request_file::read_request(&self.file)?;
        let kind = self.kind
            .map(OperationKind::from)
            .unwrap_or_else(|| request_file::infer_kind(&source));

        let template = RequestTemplate::assemble(&registry, &source, None, kind)
            .map_err(|errors| describe_errors("assemble", &errors))?;

        let values = request_file::collect_values(&template, &registry, &self.vars, &self.binds)?;
        template.bind(&registry, &values)
            .map_err(|errors| describe_errors("bind", &errors))
    }

    async fn send(
        &self,
        config: &ClientConfig,
        request: &BoundRequest,
    ) -> anyhow::Result<ResponseEnvelope> {
        let endpoint = config.endpoint.as_deref()
            .context("no endpoint given (pass `--endpoint` or set `endpoint` in the config file)")?;
        let mut builder = HttpTransport::builder(endpoint);
        for (name, value) in &config.headers {
            builder = builder.with_header(name, value);
        }
        if let Some(timeout) = config.timeout() {
            builder = builder.with_timeout(timeout);
        }
        let transport = builder.build()?;
        log::debug!("Sending {} to {}...", request.kind(), transport.endpoint());
        Ok(transport.send(request).await?)
    }

    async fn subscribe(
        &self,
        config: &ClientConfig,
        request: BoundRequest,
    ) -> anyhow::Result<ExitCode> {
        let url = match (&config.subscription_endpoint, &config.endpoint) {
            (Some(url), _) => url.to_owned(),
            (None, Some(endpoint)) => websocket_url(endpoint)?,
            (None, None) => anyhow::bail!(
                "no subscription endpoint given (pass `--subscription-endpoint` \
                or `--endpoint`)"
            ),
        };
        let mut ws_config = WebSocketConfig::default();
        for (name, value) in &config.headers {
            ws_config = ws_config.with_header(name, value);
        }
        if let Some(timeout) = config.timeout() {
            ws_config = ws_config.with_ack_timeout(timeout);
        }

        let (sender, mut receiver) = mpsc::unbounded_channel();
        let transport = WebSocketTransport::new(&url, ws_config)?;
        log::debug!("Opening subscription at {url}...");
        let handle = transport.open(request, Box::new(ForwardingListener { sender }))?;

        let mut exit_code = ExitCode::SUCCESS;
        while let Some(event) = receiver.recv().await {
            match event {
                SubscriptionEvent::Message(envelope) => {
                    if envelope.has_errors() {
                        exit_code = ExitCode::FAILURE;
                    }
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                },
                SubscriptionEvent::Error(err) => {
                    handle.unsubscribe().await;
                    return Err(err.into());
                },
                SubscriptionEvent::Complete => break,
            }
        }
        handle.unsubscribe().await;
        Ok(exit_code)
    }
}

#[inherent::inherent]
impl RunnableCommand for ExecCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        let outcome = async {
            let config = self.resolve_config()?;
            let request = self.bind(&config)?;
            if request.kind() == OperationKind::Subscription {
                return self.subscribe(&config, request).await.map(|exit_code| {
                    CommandResult {
                        exit_code,
                        stderr: None,
                        stdout: None,
                    }
                });
            }

            let envelope = self.send(&config, &request).await?;
            let pretty = serde_json::to_string_pretty(&envelope)?;
            let result = CommandResult::stdout(format_args!("{pretty}"));
            anyhow::Ok(
                if envelope.has_errors() {
                    result.with_exit_code(ExitCode::FAILURE)
                } else {
                    result
                }
            )
        }.await;

        outcome.unwrap_or_else(|err| CommandResult::stderr(format_args!(
            "{} {err:#}",
            output_utils::RED_X,
        )))
    }
}

fn describe_errors(
    stage: &str,
    errors: &[gqlbind::document::RequestPreparationError],
) -> anyhow::Error {
    anyhow::anyhow!(
        "failed to {stage} the request:\n{}",
        errors.iter()
            .map(|err| format!("    - {err}"))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// The `ws(s)://` counterpart of an `http(s)://` endpoint. WebSocket URLs are
/// returned as given.
pub(crate) fn websocket_url(endpoint: &str) -> anyhow::Result<String> {
    let mut url = Url::parse(endpoint)
        .with_context(|| format!("`{endpoint}` is not a valid endpoint url"))?;
    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        "ws" | "wss" => return Ok(url.into()),
        other => anyhow::bail!(
            "cannot derive a subscription endpoint from a `{other}` url; \
            pass `--subscription-endpoint`"
        ),
    };
    url.set_scheme(scheme)
        .map_err(|()| anyhow::anyhow!("cannot switch `{endpoint}` to `{scheme}`"))?;
    Ok(url.into())
}

enum SubscriptionEvent {
    Complete,
    Error(TransportError),
    Message(ResponseEnvelope),
}

struct ForwardingListener {
    sender: mpsc::UnboundedSender<SubscriptionEvent>,
}
impl SubscriptionListener for ForwardingListener {
    fn on_connect(&mut self) {
        log::info!("Subscription active; waiting for events...");
    }

    fn on_message(&mut self, envelope: ResponseEnvelope) {
        let _ = self.sender.send(SubscriptionEvent::Message(envelope));
    }

    fn on_error(&mut self, error: TransportError) {
        let _ = self.sender.send(SubscriptionEvent::Error(error));
    }

    fn on_complete(&mut self) {
        let _ = self.sender.send(SubscriptionEvent::Complete);
    }
}
