//! Password-gated commands on [`Q3Client`].

use super::cvar::{parse_variable, VariableValue};
use crate::{
    client::{decode, Q3Client},
    errors::{ConfigurationError, Result, ValidationError},
    socket::Transport,
};
use bytes::Bytes;

impl<T: Transport> Q3Client<T> {
    /// Run `command` on the server console and return the raw reply.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::MissingRconPassword`] without sending
    /// anything if the client has no rcon password, and anything
    /// [`send_raw`](Q3Client::send_raw) returns.
    pub async fn send_rcon_raw(&self, command: &str) -> Result<Bytes> {
        let password = self
            .config()
            .rcon_password()
            .ok_or(ConfigurationError::MissingRconPassword)?;

        self.dispatch(
            &format!("rcon {password} {command}"),
            &format!("rcon *** {command}"),
        )
        .await
    }

    /// Run `command` on the server console and return its text output.
    ///
    /// A wrong password is not an error: the server answers with
    /// `Bad rconpassword.` like any other output.
    ///
    /// # Errors
    /// Same as [`send_rcon_raw`](Self::send_rcon_raw).
    pub async fn send_rcon(&self, command: &str) -> Result<String> {
        let raw = self.send_rcon_raw(command).await?;
        Ok(decode(&raw))
    }

    /// Read a console variable.
    ///
    /// Returns `Ok(None)` if the server output does not describe `variable`,
    /// which usually means there is no such variable.
    ///
    /// # Errors
    /// Returns [`ValidationError::NotAVariable`] without sending anything if
    /// `variable` contains whitespace, and anything
    /// [`send_rcon`](Self::send_rcon) returns.
    pub async fn var_value(&self, variable: &str) -> Result<Option<VariableValue>> {
        if variable.chars().any(char::is_whitespace) {
            return Err(ValidationError::NotAVariable(variable.to_string()).into());
        }

        let response = self.send_rcon(variable).await?;
        Ok(parse_variable(variable, &response))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        client::tests::mock_client,
        errors::{ConfigurationError, Error, Result, ValidationError},
        rcon::VariableValue,
    };

    #[tokio::test]
    async fn test_rcon_prefix() -> Result<()> {
        let (client, transport) = mock_client(b"\xff\xff\xff\xffprint\nmap: ut4_casa\n", "hi!");

        let output = client.send_rcon("status").await?;

        assert_eq!(output, "print\nmap: ut4_casa\n");
        assert_eq!(
            transport.last_sent().as_deref(),
            Some(&b"\xff\xff\xff\xffrcon hi! status"[..])
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_rcon_raw_keeps_envelope() -> Result<()> {
        let (client, _) = mock_client(b"\x00\x00", "hi!");

        assert_eq!(&client.send_rcon_raw("test").await?[..], b"\x00\x00");

        Ok(())
    }

    #[tokio::test]
    async fn test_rcon_without_password() {
        let (client, transport) = mock_client(b"\xff\xff\xff\xffprint\n", "");

        assert!(matches!(
            client.send_rcon_raw("status").await,
            Err(Error::Configuration(ConfigurationError::MissingRconPassword))
        ));
        assert!(matches!(
            client.send_rcon("status").await,
            Err(Error::Configuration(ConfigurationError::MissingRconPassword))
        ));
        assert!(matches!(
            client.var_value("mapname").await,
            Err(Error::Configuration(ConfigurationError::MissingRconPassword))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_var_value() -> Result<()> {
        let (client, transport) = mock_client(
            b"\xff\xff\xff\xffprint\n\"g_gravity\" is:\"900^7\" default:\"800^7\"\n",
            "hi!",
        );

        let value = client.var_value("g_gravity").await?;

        assert_eq!(
            value,
            Some(VariableValue {
                name: "g_gravity".to_string(),
                value: "900".to_string(),
                default: Some("800".to_string()),
            })
        );
        assert_eq!(
            transport.last_sent().as_deref(),
            Some(&b"\xff\xff\xff\xffrcon hi! g_gravity"[..])
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_var_value_at_default() -> Result<()> {
        let (client, _) = mock_client(b"\xff\xff\xff\xffprint\n\"mapname\" is:\"ut4_casa\"", "hi!");

        let value = client.var_value("mapname").await?.expect("mapname is present");

        assert_eq!(value.value, "ut4_casa");
        assert_eq!(value.default, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_var_value_not_found() -> Result<()> {
        let (client, _) = mock_client(b"\xff\xff\xff\xffprint\nBad rconpassword.\n", "wrong");

        assert_eq!(client.var_value("mapname").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_var_value_rejects_whitespace() {
        let (client, transport) = mock_client(b"\xff\xff\xff\xffprint\n", "hi!");

        for name in ["bad name", "g_gravity\n", "\tquit"] {
            assert!(matches!(
                client.var_value(name).await,
                Err(Error::Validation(ValidationError::NotAVariable(n))) if n == name
            ));
        }
        assert_eq!(transport.calls(), 0);
    }
}
