//! 声明式字段校验
//!
//! 每个字段是一组按顺序执行的规则，遇到第一条失败的规则即停止。
//! 除 `Required` 外的规则在值为空时跳过。

use chrono::{Local, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{ConsoleError, Result};
use crate::utils::{format_wire_date, parse_input_date, validate_email};

/// 字段的输入类型，决定写入时如何规范化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// 写入时转为大写，例如课程代码
    UpperText,
    /// 写入时尽量规范为 `YYYY-MM-DD`
    Date,
    Integer,
    Choice(&'static [&'static str]),
    /// 不做任何处理，例如密码
    Secret,
}

#[derive(Debug, Clone, Copy)]
pub enum Check {
    Required,
    Length { min: usize, max: usize },
    MinLength(usize),
    MaxLength(usize),
    Matches(&'static Lazy<Regex>),
    Email,
    Satisfies(fn(&str) -> bool),
    IntRange { min: i64, max: i64 },
    /// 日期必须晚于另一个日期字段
    After(&'static str),
    NotBeforeToday,
    NotAfterToday,
    AgeBetween { min: u32, max: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub check: Check,
    pub message: &'static str,
}

impl Rule {
    pub const fn new(check: Check, message: &'static str) -> Self {
        Self { check, message }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, check: Check, message: &'static str) -> Self {
        self.rules.push(Rule::new(check, message));
        self
    }

    pub fn required(self, message: &'static str) -> Self {
        self.rule(Check::Required, message)
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r.check, Check::Required))
    }

    /// 按字段类型规范化输入
    pub fn normalize(&self, raw: &str) -> String {
        match self.kind {
            FieldKind::Secret => raw.to_string(),
            FieldKind::UpperText => raw.trim().to_uppercase(),
            FieldKind::Date => match parse_input_date(raw.trim()) {
                Ok(date) => format_wire_date(date),
                // 保留原文，由校验报告错误
                Err(_) => raw.trim().to_string(),
            },
            FieldKind::Choice(options) => {
                let value = raw.trim();
                options
                    .iter()
                    .find(|o| {
                        o.eq_ignore_ascii_case(value)
                            || o.trim_end_matches('.').eq_ignore_ascii_case(value)
                    })
                    .map(|o| o.to_string())
                    .unwrap_or_else(|| value.to_string())
            }
            FieldKind::Text | FieldKind::Integer => raw.trim().to_string(),
        }
    }

    fn check_kind(&self, value: &str) -> Option<String> {
        match self.kind {
            FieldKind::Date if parse_input_date(value).is_err() => {
                Some(format!("{} must be a valid date (YYYY-MM-DD)", self.label))
            }
            FieldKind::Integer if value.parse::<i64>().is_err() => {
                Some(format!("{} must be a whole number", self.label))
            }
            FieldKind::Choice(options) if !options.contains(&value) => Some(format!(
                "{} must be one of: {}",
                self.label,
                options.join(", ")
            )),
            _ => None,
        }
    }
}

/// 表单当前的输入值，字段名 -> 文本
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// 未设置的字段视为空字符串
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self, name: &str) -> bool {
        self.get(name).trim().is_empty()
    }

    pub fn text(&self, name: &str) -> String {
        self.get(name).trim().to_string()
    }

    pub fn optional(&self, name: &str) -> Option<String> {
        Some(self.text(name)).filter(|s| !s.is_empty())
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        parse_input_date(self.get(name).trim()).ok()
    }

    pub fn required_date(&self, name: &str) -> Result<NaiveDate> {
        parse_input_date(self.get(name).trim())
    }

    pub fn optional_date(&self, name: &str) -> Result<Option<NaiveDate>> {
        if self.is_blank(name) {
            return Ok(None);
        }
        self.required_date(name).map(Some)
    }

    pub fn required_int(&self, name: &str) -> Result<i64> {
        self.get(name)
            .trim()
            .parse()
            .map_err(|_| ConsoleError::validation(format!("{name} must be a whole number")))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn retain_fields(&mut self, fields: &[FieldSpec]) {
        self.0.retain(|name, _| fields.iter().any(|f| f.name == name));
    }
}

/// 字段级错误，字段名 -> 提示信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: &str, message: impl Into<String>) {
        self.0.insert(name.to_string(), message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// 校验时的“今天”
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub today: NaiveDate,
}

impl ValidationContext {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn now() -> Self {
        Self::new(Local::now().date_naive())
    }
}

/// 校验全部字段，返回所有字段的第一条错误
pub fn validate(
    fields: &[FieldSpec],
    values: &FormValues,
    ctx: &ValidationContext,
) -> std::result::Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    for field in fields {
        if let Some(message) = check_field(field, values, ctx) {
            errors.insert(field.name, message);
        }
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_field(field: &FieldSpec, values: &FormValues, ctx: &ValidationContext) -> Option<String> {
    let raw = values.get(field.name);
    let value = if field.kind == FieldKind::Secret {
        raw
    } else {
        raw.trim()
    };

    if value.is_empty() {
        return field
            .rules
            .iter()
            .find(|r| matches!(r.check, Check::Required))
            .map(|r| r.message.to_string());
    }

    if let Some(message) = field.check_kind(value) {
        return Some(message);
    }

    field
        .rules
        .iter()
        .find(|rule| !passes(rule.check, value, values, ctx))
        .map(|rule| rule.message.to_string())
}

fn passes(check: Check, value: &str, values: &FormValues, ctx: &ValidationContext) -> bool {
    let len = value.chars().count();
    match check {
        Check::Required => true,
        Check::Length { min, max } => (min..=max).contains(&len),
        Check::MinLength(min) => len >= min,
        Check::MaxLength(max) => len <= max,
        Check::Matches(re) => re.is_match(value),
        Check::Email => validate_email(value).is_ok(),
        Check::Satisfies(predicate) => predicate(value),
        Check::IntRange { min, max } => value
            .parse::<i64>()
            .map(|n| (min..=max).contains(&n))
            .unwrap_or(false),
        Check::After(other) => match (parse_input_date(value), values.date(other)) {
            (Ok(date), Some(other)) => date > other,
            // 另一个字段缺失或无效时由它自己报错
            _ => true,
        },
        Check::NotBeforeToday => parse_input_date(value)
            .map(|d| d >= ctx.today)
            .unwrap_or(false),
        Check::NotAfterToday => parse_input_date(value)
            .map(|d| d <= ctx.today)
            .unwrap_or(false),
        Check::AgeBetween { min, max } => {
            let Ok(dob) = parse_input_date(value) else {
                return false;
            };
            let youngest = ctx.today.checked_sub_months(Months::new(min * 12));
            let oldest = ctx.today.checked_sub_months(Months::new(max * 12));
            match (oldest, youngest) {
                (Some(oldest), Some(youngest)) => dob >= oldest && dob <= youngest,
                _ => false,
            }
        }
    }
}
