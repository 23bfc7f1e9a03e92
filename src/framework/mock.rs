//! # Mock Framework
//!
//! Utilities for testing a backend in isolation from the network registry.
//!
//! [`MockNetwork`] implements [`NetworkResolver`] from a FIFO queue of
//! expectations. Each lookup pops the next expectation, checks that it asks for
//! the same kind of resource with the same id, and returns the canned response.
//!
//! # Example
//! ```ignore
//! let mock = MockNetwork::new();
//! mock.expect_subnet("subnet-1").return_ok(subnet_a);
//! mock.expect_subnet("subnet-2").return_err(Ec2Error::SubnetNotFound("subnet-2".into()));
//!
//! let err = backend.create_directory(input, &mock).unwrap_err();
//! mock.verify(); // Ensures all expectations were met
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::clients::NetworkResolver;
use crate::ec2::Ec2Error;
use crate::model::ec2::{SecurityGroup, Subnet, Vpc};

/// Represents an expected lookup and the response to give it.
enum Expectation {
    Vpc {
        id: String,
        response: Result<Vpc, Ec2Error>,
    },
    Subnet {
        id: String,
        response: Result<Subnet, Ec2Error>,
    },
    SecurityGroup {
        id: String,
        response: Result<SecurityGroup, Ec2Error>,
    },
}

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

/// A network resolver driven by expectations, for fluent backend tests.
#[derive(Default)]
pub struct MockNetwork {
    expectations: Queue,
}

impl MockNetwork {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_vpc(&self, id: &str) -> ExpectationBuilder<Vpc> {
        ExpectationBuilder::new(id, self.expectations.clone(), |id, response| Expectation::Vpc { id, response })
    }

    pub fn expect_subnet(&self, id: &str) -> ExpectationBuilder<Subnet> {
        ExpectationBuilder::new(id, self.expectations.clone(), |id, response| Expectation::Subnet { id, response })
    }

    pub fn expect_security_group(&self, id: &str) -> ExpectationBuilder<SecurityGroup> {
        ExpectationBuilder::new(id, self.expectations.clone(), |id, response| {
            Expectation::SecurityGroup { id, response }
        })
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn next(&self) -> Option<Expectation> {
        self.expectations.lock().unwrap().pop_front()
    }
}

fn check_id(kind: &str, expected: &str, actual: &str) {
    if expected != actual {
        panic!("Unexpected {kind} lookup: expected '{expected}', got '{actual}'");
    }
}

impl NetworkResolver for MockNetwork {
    fn vpc(&self, vpc_id: &str) -> Result<Vpc, Ec2Error> {
        match self.next() {
            Some(Expectation::Vpc { id, response }) => {
                check_id("vpc", &id, vpc_id);
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: vpc '{vpc_id}'"),
        }
    }

    fn subnet(&self, subnet_id: &str) -> Result<Subnet, Ec2Error> {
        match self.next() {
            Some(Expectation::Subnet { id, response }) => {
                check_id("subnet", &id, subnet_id);
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: subnet '{subnet_id}'"),
        }
    }

    fn security_group(&self, group_id: &str) -> Result<SecurityGroup, Ec2Error> {
        match self.next() {
            Some(Expectation::SecurityGroup { id, response }) => {
                check_id("security group", &id, group_id);
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: security group '{group_id}'"),
        }
    }
}

/// Builder that queues one expectation when given its response.
pub struct ExpectationBuilder<T> {
    id: String,
    expectations: Queue,
    wrap: fn(String, Result<T, Ec2Error>) -> Expectation,
}

impl<T> ExpectationBuilder<T> {
    fn new(id: &str, expectations: Queue, wrap: fn(String, Result<T, Ec2Error>) -> Expectation) -> Self {
        Self {
            id: id.to_string(),
            expectations,
            wrap,
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back((self.wrap)(self.id, Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: Ec2Error) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back((self.wrap)(self.id, Err(error)));
    }
}
