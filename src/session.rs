//! Interactive text-menu driver.
//!
//! Works over any `BufRead`/`Write` pair so the binary can hand it
//! stdin/stdout and tests can script it. End of input, `q` at a parameter
//! prompt and `0` in the main menu all end the session cleanly.
//!
//! Engine errors never abort the session: they are shown to the user and
//! the prompt is repeated.

use std::fmt;
use std::io::{self, BufRead, Write};

use tracing::{debug, info};

use crate::binomial::{validate_probability, validate_trials, Binomial, Query};
use crate::config::SessionConfig;
use crate::render::{format_probability, render_chart, render_table, ChartKind};

const SCREEN_WIDTH: usize = 80;
const CLEAR: &str = "\x1b[H\x1b[J";

const MAIN_MENU: [&str; 4] = [
    "Operations on Pr(X = x)",
    "Graph",
    "Summary",
    "Change n and pi",
];

/// Why the session is unwinding.
enum Stop {
    Quit,
    Io(io::Error),
}

impl From<io::Error> for Stop {
    fn from(e: io::Error) -> Self {
        Stop::Io(e)
    }
}

type Step<T> = Result<T, Stop>;

/// Which screen heads the parameter prompt.
#[derive(Clone, Copy)]
enum ParamScreen {
    Title,
    Change,
}

/// Menu-driven calculator over a reader and a writer.
pub struct Session<R, W> {
    input: R,
    output: W,
    config: SessionConfig,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a session reading answers from `input` and drawing screens to `output`.
    pub fn new(input: R, output: W, config: SessionConfig) -> Self {
        Self {
            input,
            output,
            config,
        }
    }

    /// Gives back the writer, e.g. to inspect a scripted run.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the calculator until the user quits or input ends.
    ///
    /// # Errors
    /// Only I/O failures on the underlying reader or writer.
    pub fn run(&mut self) -> io::Result<()> {
        info!("session started");
        match self.main_loop() {
            Ok(()) | Err(Stop::Quit) => {
                info!("session ended");
                Ok(())
            }
            Err(Stop::Io(e)) => Err(e),
        }
    }

    fn main_loop(&mut self) -> Step<()> {
        self.clear()?;
        let (n, pi) = self.ask_parameters(ParamScreen::Title)?;
        let mut dist = match Binomial::new(n, pi) {
            Ok(dist) => dist,
            Err(e) => {
                // Parameters were validated at the prompt.
                writeln!(self.output, "{e}")?;
                return self.end_screen();
            }
        };
        self.clear()?;

        loop {
            match self.select("Main Menu", '=', &MAIN_MENU)? {
                0 => return self.end_screen(),
                1 => {
                    self.clear()?;
                    self.operations_menu(&dist)?;
                }
                2 => {
                    self.clear()?;
                    self.graph_menu(&dist)?;
                }
                3 => {
                    self.clear()?;
                    self.summary(&dist)?;
                }
                _ => {
                    self.clear()?;
                    self.change_parameters(&mut dist)?;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Screens
    // ------------------------------------------------------------------

    fn title(&mut self) -> Step<()> {
        self.header("Binomial Distribution Calculator", '=')?;
        let text = "             / n \\      x         n - x\n\
                    Pr(X = x) = |     | (pi)  (1 - pi)\n\
                    \x20            \\ x /\n\
                    \n\
                    Where:\n\
                    \t- n = Total number of independent trials\n\
                    \t- pi = Probability of success/target outcome\n\
                    \t- x = Number of successes (the little x in Pr(X = x))\n\
                    Conditions:\n\
                    \t- Event can be summarized to two outcomes (i.e. pi and its complement)\n\
                    \t- Trials (n) must be independent\n\
                    \t- Trials (n) must be fixed prior to data collection\n\
                    \t- Probability of success/target outcome (pi) must stay constant\n";
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    fn operations_menu(&mut self, dist: &Binomial) -> Step<()> {
        let labels = Query::ALL.map(|q| q.to_string());
        loop {
            let choice = self.select(MAIN_MENU[0], '*', &labels)?;
            if choice == 0 {
                return self.pause();
            }
            let query = Query::ALL[choice - 1];
            self.clear()?;
            let Some(x) = self.ask_x(&labels[choice - 1], dist.n())? else {
                continue;
            };
            match dist.evaluate(query, x) {
                Ok(p) => writeln!(
                    self.output,
                    "Pr(X {} {x}) = {}\n",
                    query.symbol(),
                    format_probability(p, self.config.precision)
                )?,
                Err(e) => writeln!(self.output, "{e}\n")?,
            }
            self.pause()?;
        }
    }

    fn graph_menu(&mut self, dist: &Binomial) -> Step<()> {
        let labels = ChartKind::ALL.map(ChartKind::label);
        loop {
            let choice = self.select(MAIN_MENU[1], '*', &labels)?;
            if choice == 0 {
                return self.pause();
            }
            let kind = ChartKind::ALL[choice - 1];
            let path = self.config.chart_path(dist, kind);
            match render_chart(dist, kind, &path, self.config.chart) {
                Ok(()) => writeln!(self.output, "Chart written to {}", path.display())?,
                Err(e) => {
                    debug!(error = %e, "chart rendering failed");
                    writeln!(self.output, "Could not draw the chart: {e}")?;
                }
            }
            self.pause()?;
        }
    }

    fn summary(&mut self, dist: &Binomial) -> Step<()> {
        self.header(MAIN_MENU[2], '*')?;
        let table = render_table(&dist.outcomes(), self.config.precision);
        writeln!(self.output, "{table}")?;
        writeln!(self.output, "{}\n", dist.describe())?;
        self.pause()
    }

    fn change_parameters(&mut self, dist: &mut Binomial) -> Step<()> {
        let (n, pi) = self.ask_parameters(ParamScreen::Change)?;
        if let Err(e) = dist.set_n(n).and_then(|()| dist.set_pi(pi)) {
            writeln!(self.output, "{e}")?;
        }
        self.pause()
    }

    fn end_screen<T>(&mut self) -> Step<T> {
        write!(self.output, "See you soon! Press ENTER to quit. ")?;
        self.output.flush()?;
        // Anything, including end of input, quits.
        let _ = self.read_line()?;
        Err(Stop::Quit)
    }

    // ------------------------------------------------------------------
    // Prompts
    // ------------------------------------------------------------------

    fn ask_parameters(&mut self, screen: ParamScreen) -> Step<(i64, f64)> {
        loop {
            match screen {
                ParamScreen::Title => self.title()?,
                ParamScreen::Change => self.header(MAIN_MENU[3], '*')?,
            }
            writeln!(self.output, "NOTE: Type Q/q to quit.\n")?;

            let text = self.prompt("What is the value of n? (Must be a whole number): ")?;
            if is_quit(&text) {
                return self.end_screen();
            }
            let n = match text.parse::<i64>() {
                Ok(n) => n,
                Err(e) => {
                    self.invalid(e)?;
                    continue;
                }
            };
            if let Err(e) = validate_trials(n) {
                self.invalid(e)?;
                continue;
            }

            let text = self.prompt("What is the value of pi?: ")?;
            if is_quit(&text) {
                return self.end_screen();
            }
            let pi = match text.parse::<f64>() {
                Ok(pi) => pi,
                Err(e) => {
                    self.invalid(e)?;
                    continue;
                }
            };
            if let Err(e) = validate_probability(pi) {
                self.invalid(e)?;
                continue;
            }

            return Ok((n, pi));
        }
    }

    /// Prompts for `x` in `[0, n]`. `None` when the user backs out with `q`.
    fn ask_x(&mut self, title: &str, n: u64) -> Step<Option<i64>> {
        loop {
            self.header(title, '-')?;
            writeln!(self.output, "NOTE: Type Q/q to quit.\n")?;
            let text = self.prompt(&format!(
                "What is the value of x (i.e small x)? Must be between 0 and {n}: "
            ))?;
            if is_quit(&text) {
                self.pause()?;
                return Ok(None);
            }
            let x = match text.parse::<i64>() {
                Ok(x) => x,
                Err(e) => {
                    self.invalid(e)?;
                    continue;
                }
            };
            if x < 0 || x as u64 > n {
                self.not_in_selection()?;
                continue;
            }
            return Ok(Some(x));
        }
    }

    /// Numbered menu with `(0) Quit`; returns the chosen number.
    fn select<S: AsRef<str>>(&mut self, title: &str, symbol: char, options: &[S]) -> Step<usize> {
        loop {
            self.header(title, symbol)?;
            writeln!(self.output, "What do you want to do?")?;
            for (i, option) in options.iter().enumerate() {
                writeln!(self.output, "({}) {}", i + 1, option.as_ref())?;
            }
            writeln!(self.output, "(0) Quit")?;

            let text = self.prompt(&format!(
                "\nPlease enter a number between 0 and {}: ",
                options.len()
            ))?;
            match text.parse::<usize>() {
                Ok(choice) if choice <= options.len() => return Ok(choice),
                Ok(_) => self.not_in_selection()?,
                Err(e) => self.invalid(e)?,
            }
        }
    }

    // ------------------------------------------------------------------
    // Terminal helpers
    // ------------------------------------------------------------------

    fn header(&mut self, title: &str, symbol: char) -> Step<()> {
        let width = SCREEN_WIDTH;
        let rule = symbol.to_string().repeat(width);
        writeln!(self.output, "{rule}")?;
        writeln!(self.output, "{title:^width$}")?;
        writeln!(self.output, "{rule}")?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Step<String> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        match self.read_line()? {
            Some(line) => Ok(line),
            None => Err(Stop::Quit),
        }
    }

    /// One trimmed line, `None` at end of input.
    fn read_line(&mut self) -> Step<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn pause(&mut self) -> Step<()> {
        write!(self.output, "Press ENTER to continue. ")?;
        self.output.flush()?;
        if self.read_line()?.is_none() {
            return Err(Stop::Quit);
        }
        self.clear()
    }

    fn invalid(&mut self, err: impl fmt::Display) -> Step<()> {
        debug!(error = %err, "rejected input");
        write!(self.output, "Invalid input! ({err}) ")?;
        self.pause()
    }

    fn not_in_selection(&mut self) -> Step<()> {
        write!(self.output, "Not in selection! ")?;
        self.pause()
    }

    fn clear(&mut self) -> Step<()> {
        if self.config.clear_screen {
            write!(self.output, "{}", CLEAR)?;
        }
        Ok(())
    }
}

fn is_quit(text: &str) -> bool {
    text.eq_ignore_ascii_case("q")
}
