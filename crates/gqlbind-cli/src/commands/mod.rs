mod check;
pub(crate) mod exec;

use crate::Cli;
use crate::CommandResult;
use check::CheckCmd;
use exec::ExecCmd;

#[derive(Debug, clap::Parser)]
#[command(name = "gqlbind")]
pub(crate) enum CommandEnum {
    /// Assemble request files and report their variables and bind
    /// parameters.
    Check(Box<CheckCmd>),

    /// Bind and execute a request file against a GraphQL endpoint.
    Exec(Box<ExecCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::Check(cmd) => cmd.run(cli).await,
            Self::Exec(cmd) => cmd.run(cli).await,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum KindArg {
    Mutation,
    Query,
    Subscription,
}
impl From<KindArg> for gqlbind::OperationKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Mutation => Self::Mutation,
            KindArg::Query => Self::Query,
            KindArg::Subscription => Self::Subscription,
        }
    }
}
