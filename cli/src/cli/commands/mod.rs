use std::collections::HashMap;
use std::future::Future;

use anyhow::{Result, anyhow, bail};
use encrucijada_core::{ActionId, SessionHandle, SessionView, headline_at};
use tokio::runtime::Runtime;

use super::{print_actions, print_help, print_history, print_report, print_status};

const DEFAULT_HISTORY_POINTS: usize = 20;

pub struct Context<'a> {
    runtime: &'a Runtime,
    session: &'a SessionHandle,
    headline: usize,
    quit: bool,
}

impl<'a> Context<'a> {
    pub fn new(runtime: &'a Runtime, session: &'a SessionHandle) -> Self {
        Self {
            runtime,
            session,
            headline: 0,
            quit: false,
        }
    }

    pub fn view(&self) -> SessionView {
        self.session.view()
    }

    pub fn session(&self) -> &SessionHandle {
        self.session
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn next_headline(&mut self) -> &'static str {
        let headline = headline_at(self.headline);
        self.headline += 1;
        headline
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

pub struct Args<'a> {
    tokens: Vec<&'a str>,
    index: usize,
}

impl<'a> Args<'a> {
    pub fn new(tokens: Vec<&'a str>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn next(&mut self) -> Option<&'a str> {
        if self.index >= self.tokens.len() {
            return None;
        }
        let value = self.tokens[self.index];
        self.index += 1;
        Some(value)
    }

    pub fn next_required(&mut self, message: &str) -> Result<&'a str> {
        self.next().ok_or_else(|| anyhow!(message.to_owned()))
    }
}

pub trait Command {
    fn name() -> &'static str;
    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()>;
}

type CommandFn = for<'a, 'b> fn(&mut Context<'b>, Args<'a>) -> Result<()>;

pub struct CommandRegistry {
    handlers: HashMap<&'static str, CommandFn>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<C: Command>(&mut self) {
        let name = C::name();
        if self.handlers.insert(name, C::execute).is_some() {
            panic!("comando registrado dos veces: {name}");
        }
    }

    pub fn dispatch(&self, command: &str, ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        if let Some(handler) = self.handlers.get(command) {
            handler(ctx, args)
        } else {
            bail!("comando desconocido: {command}. Escriba help para ver la lista.");
        }
    }

    pub fn execute_input(&self, ctx: &mut Context<'_>, input: &str) -> Result<()> {
        let mut parts = input.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(anyhow!("no se indicó ningún comando."));
        };
        let command_name = head.to_ascii_lowercase();
        let args = Args::new(parts.collect());
        self.dispatch(command_name.as_str(), ctx, args)
    }

    #[cfg(test)]
    fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register::<HelpCommand>();
        registry.register::<HelpAliasCommand>();
        registry.register::<StartCommand>();
        registry.register::<StatusCommand>();
        registry.register::<StatusAliasCommand>();
        registry.register::<ActionsCommand>();
        registry.register::<ActCommand>();
        registry.register::<HistoryCommand>();
        registry.register::<AdviseCommand>();
        registry.register::<AdviceCommand>();
        registry.register::<ResetCommand>();
        registry.register::<QuitCommand>();
        registry.register::<ExitCommand>();
        registry
    }
}

pub struct HelpCommand;

impl Command for HelpCommand {
    fn name() -> &'static str {
        "help"
    }

    fn execute(_ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_help();
        Ok(())
    }
}

pub struct HelpAliasCommand;

impl Command for HelpAliasCommand {
    fn name() -> &'static str {
        "?"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        HelpCommand::execute(ctx, args)
    }
}

pub struct StartCommand;

impl Command for StartCommand {
    fn name() -> &'static str {
        "start"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        ctx.block_on(ctx.session().start())?;
        println!("Ha juramentado el cargo. Los mercados están abiertos.");
        let view = ctx.view();
        println!("Asesor: {}", view.advisor_message);
        let headline = ctx.next_headline();
        print_status(&view, headline);
        Ok(())
    }
}

pub struct StatusCommand;

impl Command for StatusCommand {
    fn name() -> &'static str {
        "status"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        let view = ctx.view();
        let headline = ctx.next_headline();
        print_status(&view, headline);
        Ok(())
    }
}

pub struct StatusAliasCommand;

impl Command for StatusAliasCommand {
    fn name() -> &'static str {
        "st"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        StatusCommand::execute(ctx, args)
    }
}

pub struct ActionsCommand;

impl Command for ActionsCommand {
    fn name() -> &'static str {
        "actions"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_actions(&ctx.view());
        Ok(())
    }
}

pub struct ActCommand;

impl Command for ActCommand {
    fn name() -> &'static str {
        "act"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let token = args.next_required("indique la decisión a ejecutar (ej: act austerity).")?;
        let action: ActionId = token.parse()?;
        let report = ctx.block_on(ctx.session().act(action))?;
        print_report(&report, &ctx.view());
        Ok(())
    }
}

pub struct HistoryCommand;

impl Command for HistoryCommand {
    fn name() -> &'static str {
        "history"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let count = match args.next() {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| anyhow!("la cantidad debe ser un entero positivo: {token}"))?,
            None => DEFAULT_HISTORY_POINTS,
        };
        let view = ctx.view();
        print_history(view.state.latest_history(count));
        Ok(())
    }
}

pub struct AdviseCommand;

impl Command for AdviseCommand {
    fn name() -> &'static str {
        "advise"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        if ctx.block_on(ctx.session().request_advice())? {
            println!("Consultando al asesor. Use advice para leer la respuesta.");
        } else {
            println!("El asesor todavía está analizando la consulta anterior.");
        }
        Ok(())
    }
}

pub struct AdviceCommand;

impl Command for AdviceCommand {
    fn name() -> &'static str {
        "advice"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        let view = ctx.view();
        if view.advice_in_flight {
            println!("Asesor: Analizando datos...");
        } else {
            println!("Asesor: {}", view.advisor_message);
        }
        Ok(())
    }
}

pub struct ResetCommand;

impl Command for ResetCommand {
    fn name() -> &'static str {
        "reset"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        ctx.block_on(ctx.session().reset())?;
        let view = ctx.view();
        println!("Asesor: {}", view.advisor_message);
        let headline = ctx.next_headline();
        print_status(&view, headline);
        Ok(())
    }
}

pub struct QuitCommand;

impl Command for QuitCommand {
    fn name() -> &'static str {
        "quit"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        println!("Renuncia aceptada. Hasta pronto, Ministro.");
        ctx.request_quit();
        Ok(())
    }
}

pub struct ExitCommand;

impl Command for ExitCommand {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        QuitCommand::execute(ctx, args)
    }
}
