//! TCP HTTP server.
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::time::Instant;

use log::*;

use crate::{
    dispatcher::Dispatcher,
    request::Framing,
    runner::ThreadRunner,
    server::{exchange, Server, ServerConfig, ServerError},
};

/// Accepts connections on one address and hands each of them to its own
/// unit of work. One request per connection, the connection is closed
/// after the response.
pub struct TcpServer {
    listener: TcpListener,
    runner: ThreadRunner,
    dispatcher: Dispatcher,
    config: ServerConfig,
}

impl TcpServer {
    pub fn new(config: ServerConfig, dispatcher: Dispatcher) -> Result<Self, ServerError> {
        Ok(Self {
            listener: TcpListener::bind(&config.bind_addr)?,
            runner: ThreadRunner::new(),
            dispatcher,
            config,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }
}

impl Server for TcpServer {
    fn serve_one(&mut self) -> Result<(), ServerError> {
        let (stream, addr) = self.listener.accept()?;
        debug!("accepted connection from {:?}", addr);
        stream.set_read_timeout(self.config.timeout)?;
        stream.set_write_timeout(self.config.timeout)?;
        let dispatcher = self.dispatcher.clone();
        let framing = self.config.framing;
        self.runner
            .run(move || handle_connection(stream, addr, &dispatcher, framing));
        Ok(())
    }
}

fn handle_connection(
    mut stream: TcpStream,
    addr: SocketAddr,
    dispatcher: &Dispatcher,
    framing: Framing,
) {
    let start = Instant::now();
    let exchange = exchange(&mut stream, dispatcher, framing);
    info!(
        "{:?} - {}ms - {} {} {} -> {} ({} bytes)",
        std::thread::current().id(),
        start.elapsed().as_millis(),
        addr,
        exchange.request.verb,
        exchange.request.path,
        exchange.status_code,
        exchange.content_length,
    );
    if let Err(e) = stream.shutdown(Shutdown::Both) {
        debug!("closing connection from {}: {}", addr, e);
    }
}
