use anyhow::Result;

use super::Command;
use crate::app::context::AppContext;
use crate::core::harness::SuiteReport;
use crate::core::suites;

pub struct PostgresCommand<'a> {
    pub image: Option<&'a str>,
    pub name: Option<&'a str>,
}

impl Command for PostgresCommand<'_> {
    fn run(&self, ctx: &AppContext) -> Result<SuiteReport> {
        Ok(suites::postgres::run(&ctx.cfg, self.image, self.name))
    }
}
