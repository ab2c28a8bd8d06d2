//! Request-scoped facts.

/// Facts known only in the context of a single request: the bound local
/// address, the protocol the client spoke, and the identity strings the
/// serving stack advertises. Every field is optional; an absent field is
/// simply omitted from the report.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    /// Bound local address the request arrived on.
    pub server_addr: Option<String>,
    /// Bound local port.
    pub server_port: Option<u16>,
    /// Protocol line, e.g. "HTTP/1.1".
    pub protocol: Option<String>,
    /// Web server software string, e.g. "hostinfo/0.1.0".
    pub software: Option<String>,
    /// Administrator contact for this server.
    pub server_admin: Option<String>,
    /// Gateway interface string, e.g. "CGI/1.1", when fronted by one.
    pub gateway_interface: Option<String>,
}

impl RequestContext {
    /// A context with nothing known, useful for rendering outside a request.
    pub fn empty() -> Self {
        Self::default()
    }
}
