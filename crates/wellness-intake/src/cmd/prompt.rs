use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use anyhow::{Result, bail};
use intake_spec::{
    AnswerSet, ChoiceOption, Locale, OptionCatalog, QuestionKind, QuestionSpec, Rank,
    SERVICES_NEEDED, ScalarField, Service, SetField,
};

use crate::cmd::i18n::{tr_key, trf};

/// Line-oriented prompter over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    locale: Locale,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, locale: Locale) -> Self {
        Self {
            input,
            output,
            locale,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            bail!("{}", tr_key("cli.prompt.stdin_closed"));
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, key: &str) -> Result<()> {
        writeln!(self.output, "{}", tr_key(key))?;
        Ok(())
    }

    fn title(&self, question: &QuestionSpec) -> String {
        let title = question.title.resolve(self.locale);
        let title = match question.number {
            Some(number) => format!("{number}. {title}"),
            None => title,
        };
        if question.required {
            format!("{title} {}", tr_key("cli.prompt.required_marker"))
        } else {
            title
        }
    }

    fn list_options(&mut self, options: &[ChoiceOption]) -> Result<()> {
        for (idx, option) in options.iter().enumerate() {
            writeln!(
                self.output,
                "  {}. {}",
                idx + 1,
                option.label.resolve(self.locale)
            )?;
        }
        Ok(())
    }

    pub fn text(&mut self, question: &QuestionSpec, current: &str) -> Result<String> {
        let title = self.title(question);
        loop {
            if current.is_empty() {
                write!(self.output, "{title}: ")?;
            } else {
                write!(self.output, "{title} [{current}]: ")?;
            }
            let input = self.read_line()?;
            if input.is_empty() {
                if !current.is_empty() {
                    return Ok(current.to_string());
                }
                if question.required {
                    self.say("cli.prompt.value_required")?;
                    continue;
                }
            }
            return Ok(input);
        }
    }

    pub fn choice(&mut self, question: &QuestionSpec, current: &str) -> Result<String> {
        let title = self.title(question);
        loop {
            writeln!(self.output, "{title}")?;
            self.list_options(&question.options)?;
            let hint = tr_key("cli.prompt.select_number_or_value");
            if current.is_empty() {
                write!(self.output, "{hint} ")?;
            } else {
                write!(self.output, "{hint} [{current}] ")?;
            }
            let input = self.read_line()?;
            if input.is_empty() {
                if !current.is_empty() || !question.required {
                    return Ok(current.to_string());
                }
                self.say("cli.prompt.value_required")?;
                continue;
            }
            match pick_option(&question.options, &input) {
                Some(value) => return Ok(value),
                None => self.say("cli.prompt.invalid_choice")?,
            }
        }
    }

    pub fn multi_choice(&mut self, question: &QuestionSpec) -> Result<Vec<String>> {
        let title = self.title(question);
        loop {
            writeln!(self.output, "{title}")?;
            self.list_options(&question.options)?;
            write!(self.output, "{} ", tr_key("cli.prompt.select_many"))?;
            let input = self.read_line()?;
            let picked = input
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(|token| pick_option(&question.options, token))
                .collect::<Option<Vec<_>>>();
            match picked {
                Some(values) => return Ok(values),
                None => self.say("cli.prompt.invalid_choice")?,
            }
        }
    }

    /// Asks for the services holding ranks 1 to 3. A service can hold one rank.
    pub fn ranking(&mut self, question: &QuestionSpec) -> Result<BTreeMap<Service, Rank>> {
        let title = self.title(question);
        writeln!(self.output, "{title}")?;
        self.list_options(&question.options)?;
        let mut ranked = BTreeMap::new();
        for rank in Rank::ALL {
            loop {
                write!(self.output, "{} ", trf("cli.prompt.rank", &[rank.as_str()]))?;
                let input = self.read_line()?;
                if input.is_empty() {
                    break;
                }
                let Some(service) = pick_option(&question.options, &input)
                    .and_then(|value| value.parse::<Service>().ok())
                else {
                    self.say("cli.prompt.invalid_choice")?;
                    continue;
                };
                if ranked.contains_key(&service) {
                    self.say("cli.prompt.already_ranked")?;
                    continue;
                }
                ranked.insert(service, rank);
                break;
            }
        }
        Ok(ranked)
    }

    /// Walks the catalog in order, asking every question whose condition holds.
    pub fn collect(&mut self, catalog: &OptionCatalog, answers: &mut AnswerSet) -> Result<()> {
        for question in &catalog.questions {
            if let Some(condition) = &question.ask_when {
                let current = ScalarField::from_key(&condition.question)
                    .map(|field| answers.text(field))
                    .unwrap_or_default();
                if current != condition.equals {
                    continue;
                }
            }
            self.ask(question, answers)?;
        }
        Ok(())
    }

    /// Asks one question and stores the answer.
    pub fn ask(&mut self, question: &QuestionSpec, answers: &mut AnswerSet) -> Result<()> {
        if question.id == SERVICES_NEEDED {
            answers.services_needed = self.ranking(question)?;
            return Ok(());
        }
        if let Some(field) = SetField::from_key(&question.id) {
            let picked = self.multi_choice(question)?;
            for value in answers.members(field).to_vec() {
                answers.toggle_member(field, value, false);
            }
            for value in picked {
                answers.toggle_member(field, value, true);
            }
            return Ok(());
        }
        let Some(field) = ScalarField::from_key(&question.id) else {
            return Ok(());
        };
        let current = answers.text(field).to_string();
        let value = match question.kind {
            QuestionKind::Text => self.text(question, &current)?,
            QuestionKind::Choice | QuestionKind::Rating => self.choice(question, &current)?,
            QuestionKind::MultiChoice | QuestionKind::Ranking => return Ok(()),
        };
        answers.set_text(field, value);
        Ok(())
    }
}

/// Accepts a 1-based option number or an option value.
fn pick_option(options: &[ChoiceOption], input: &str) -> Option<String> {
    if let Ok(n) = input.parse::<usize>()
        && n > 0
        && n <= options.len()
    {
        return Some(options[n - 1].value.clone());
    }
    options
        .iter()
        .find(|option| option.value == input)
        .map(|option| option.value.clone())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            Locale::En,
        )
    }

    fn question(id: &str) -> &'static QuestionSpec {
        OptionCatalog::builtin()
            .question(id)
            .unwrap_or_else(|| panic!("missing question {id}"))
    }

    #[test]
    fn required_text_reprompts_until_filled() {
        let mut p = prompter("\n  Asha \n");
        let value = p.text(question("name"), "").expect("text");
        assert_eq!(value, "Asha");
        let out = String::from_utf8(p.into_output()).expect("utf8");
        assert!(out.contains("Name *: "));
        assert!(out.contains("A value is required."));
    }

    #[test]
    fn choice_accepts_number_or_value() {
        let mut p = prompter("2\n");
        assert_eq!(p.choice(question("gender"), "").expect("choice"), "female");
        let mut p = prompter("9\nother\n");
        assert_eq!(p.choice(question("gender"), "").expect("choice"), "other");
    }

    #[test]
    fn optional_choice_can_be_skipped() {
        let mut p = prompter("\n");
        assert_eq!(p.choice(question("visited_doctor"), "").expect("choice"), "");
    }

    #[test]
    fn multi_choice_parses_list() {
        let mut p = prompter("1, weekend\n");
        let values = p.multi_choice(question("visit_hours")).expect("multi");
        assert_eq!(values, vec!["morning", "weekend"]);
    }

    #[test]
    fn ranking_skips_and_refuses_repeats() {
        let mut p = prompter("4\n4\n1\n\n");
        let ranked = p.ranking(question(SERVICES_NEEDED)).expect("ranking");
        assert_eq!(ranked.get(&Service::Diagnostic), Some(&Rank::First));
        assert_eq!(ranked.get(&Service::GeneralOpd), Some(&Rank::Second));
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn closed_stdin_is_an_error() {
        let mut p = prompter("");
        assert!(p.text(question("name"), "").is_err());
    }

    #[test]
    fn follow_up_number_only_asked_for_matching_channel() {
        let catalog = OptionCatalog::builtin();
        let mut answers = AnswerSet {
            follow_up: "whatsapp".into(),
            ..AnswerSet::default()
        };
        let mut p = prompter("91234\n");
        for id in ["phone", "whatsapp"] {
            let question = question(id);
            let condition = question.ask_when.as_ref().expect("condition");
            if answers.follow_up == condition.equals {
                p.ask(question, &mut answers).expect("ask");
            }
        }
        assert_eq!(answers.whatsapp, "91234");
        assert_eq!(answers.phone, "");
        assert!(catalog.question("phone").is_some());
    }
}
