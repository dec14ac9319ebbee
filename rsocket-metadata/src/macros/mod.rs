mod composite;
mod routing;
