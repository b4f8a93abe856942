use std::error::Error;

use rusoto_core::RusotoError;
use rusoto_secretsmanager::GetSecretValueError;
use rusoto_sqs::SendMessageError;
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum DeviceNotifierError {
    MissingEnvVar(&'static str),
    MissingDeviceApiUrl,
    MissingSecretId,
    MissingSecretString,
    GetSecretError(RusotoError<GetSecretValueError>),
    DeviceApiError(reqwest::Error),
    SendMessageError(RusotoError<SendMessageError>),
}

impl Display for DeviceNotifierError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            DeviceNotifierError::MissingEnvVar(name) => {
                write!(f, "{} environment variable not set", name)
            }
            DeviceNotifierError::MissingDeviceApiUrl => {
                write!(f, "DEVICE_API_URL environment variable not set or empty")
            }
            DeviceNotifierError::MissingSecretId => {
                write!(f, "SECRET_ARN environment variable not set")
            }
            DeviceNotifierError::MissingSecretString => {
                write!(f, "Secret value has no SecretString")
            }
            DeviceNotifierError::GetSecretError(ref error) => Display::fmt(error, f),
            DeviceNotifierError::DeviceApiError(ref error) => Display::fmt(error, f),
            DeviceNotifierError::SendMessageError(ref error) => Display::fmt(error, f),
        }
    }
}

impl Error for DeviceNotifierError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            DeviceNotifierError::GetSecretError(ref error) => Some(error),
            DeviceNotifierError::DeviceApiError(ref error) => Some(error),
            DeviceNotifierError::SendMessageError(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<RusotoError<GetSecretValueError>> for DeviceNotifierError {
    fn from(e: RusotoError<GetSecretValueError>) -> DeviceNotifierError {
        DeviceNotifierError::GetSecretError(e)
    }
}

impl From<reqwest::Error> for DeviceNotifierError {
    fn from(e: reqwest::Error) -> DeviceNotifierError {
        DeviceNotifierError::DeviceApiError(e)
    }
}

impl From<RusotoError<SendMessageError>> for DeviceNotifierError {
    fn from(e: RusotoError<SendMessageError>) -> DeviceNotifierError {
        DeviceNotifierError::SendMessageError(e)
    }
}
