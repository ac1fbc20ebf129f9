use ramhorns::{Content, Template};

decl_scenarios! {
    /// Sent to each address in an invite batch.
    EventInvite use "event_invite.mustache" {
        inviter_name: String,
        event_name: String,
        accept_url: String,
        /// `YYYY-MM-DD`
        expires_on: String,
    },
}

/// Every scenario template, parsed once at startup.
pub struct Templates {
    tpls: Vec<(&'static str, Template<'static>)>,
}

impl Templates {
    pub fn load() -> Result<Self, ramhorns::Error> {
        let mut tpls = Vec::with_capacity(Scenario::SOURCES.len());

        for (path, source) in Scenario::SOURCES {
            tpls.push((*path, Template::new(*source)?));
        }

        Ok(Templates { tpls })
    }

    pub fn render(&self, scenario: &Scenario) -> Option<String> {
        let path = scenario.path();

        self.tpls.iter().find(|(p, _)| *p == path).map(|(_, tpl)| scenario.render_with(tpl))
    }
}
